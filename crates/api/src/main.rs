use anyhow::Context;
use std::net::SocketAddr;
use sweats::config::Config;

mod api;
mod data;
mod error;
mod routes;
mod sentry;
mod state;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    sentry::init_tracing();

    let config = Config::from_env();
    let _sentry_guard = sentry::init_sentry_guard(&config);

    let app_state = state::AppState::new(&config).await;
    let app = api::create_api(app_state);

    if config.lambda_runtime {
        tracing::info!("Starting under the Lambda runtime");
        return lambda_http::run(app)
            .await
            .map_err(|err| anyhow::anyhow!(err));
    }

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("Listening on {addr}");
    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}
