use sweats::config::Config;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

/// Installs the global subscriber: `RUST_LOG`-filtered fmt output, with warnings and errors
/// forwarded to Sentry once a client is bound.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer())
        .init();
}

pub fn init_sentry_guard(config: &Config) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.clone()?;

    let guard = sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            // Capture user IPs and potentially sensitive headers with HTTP server integrations.
            // See https://docs.sentry.io/platforms/rust/data-management/data-collected
            send_default_pii: true,
            ..Default::default()
        },
    ));

    Some(guard)
}
