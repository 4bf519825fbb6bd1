use std::env;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_TABLE_NAME: &str = "sweats";

pub const MOJANG_API_URL: &str = "https://api.mojang.com";
pub const HYPIXEL_API_URL: &str = "https://api.hypixel.net";
pub const URCHIN_API_URL: &str = "https://urchin.ws";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StoreKind {
    DynamoDb,
    Memory,
}

/// Everything the service reads from the environment, resolved once at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub port: u16,
    pub store: StoreKind,
    pub table_name: String,
    pub dynamodb_endpoint_url: Option<String>,
    pub hypixel_api_key: Option<String>,
    pub urchin_api_key: Option<String>,
    pub mojang_api_url: String,
    pub hypixel_api_url: String,
    pub urchin_api_url: String,
    pub sentry_dsn: Option<String>,
    /// Set when running inside the AWS Lambda runtime.
    pub lambda_runtime: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            store: StoreKind::DynamoDb,
            table_name: DEFAULT_TABLE_NAME.to_string(),
            dynamodb_endpoint_url: None,
            hypixel_api_key: None,
            urchin_api_key: None,
            mojang_api_url: MOJANG_API_URL.to_string(),
            hypixel_api_url: HYPIXEL_API_URL.to_string(),
            urchin_api_url: URCHIN_API_URL.to_string(),
            sentry_dsn: None,
            lambda_runtime: false,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable source. Empty values count as unset.
    /// Missing settings are logged, never fatal: the routes that need them fail at call time.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let defaults = Self::default();

        let port = match get("PORT") {
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                tracing::warn!("PORT={raw:?} is not a valid port, using {DEFAULT_PORT}");
                DEFAULT_PORT
            }),
            None => DEFAULT_PORT,
        };

        let store = match get("SWEATS_STORE").as_deref() {
            Some("memory") => StoreKind::Memory,
            Some("dynamodb") | None => StoreKind::DynamoDb,
            Some(other) => {
                tracing::warn!("Unknown SWEATS_STORE={other:?}, using dynamodb");
                StoreKind::DynamoDb
            }
        };

        let table_name = get("TABLE_NAME").unwrap_or_else(|| {
            if store == StoreKind::DynamoDb {
                tracing::warn!("TABLE_NAME is not set, falling back to {DEFAULT_TABLE_NAME:?}");
            }
            defaults.table_name.clone()
        });

        let hypixel_api_key = get("HYPIXEL_API_KEY");
        if hypixel_api_key.is_none() {
            tracing::warn!("HYPIXEL_API_KEY is not set, /player lookups will fail");
        }
        let urchin_api_key = get("URCHIN_API_KEY");
        if urchin_api_key.is_none() {
            tracing::warn!("URCHIN_API_KEY is not set, tag lookups will fall back");
        }

        Self {
            port,
            store,
            table_name,
            dynamodb_endpoint_url: get("DYNAMODB_ENDPOINT_URL"),
            hypixel_api_key,
            urchin_api_key,
            mojang_api_url: get("MOJANG_API_URL").unwrap_or(defaults.mojang_api_url),
            hypixel_api_url: get("HYPIXEL_API_URL").unwrap_or(defaults.hypixel_api_url),
            urchin_api_url: get("URCHIN_API_URL").unwrap_or(defaults.urchin_api_url),
            sentry_dsn: get("SENTRY_DSN"),
            lambda_runtime: get("AWS_LAMBDA_RUNTIME_API").is_some(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults_when_environment_is_empty() {
        let config = config_from(&[]);
        assert_eq!(config.port, 3000);
        assert_eq!(config.store, StoreKind::DynamoDb);
        assert_eq!(config.table_name, "sweats");
        assert!(config.hypixel_api_key.is_none());
        assert!(config.urchin_api_key.is_none());
        assert_eq!(config.mojang_api_url, MOJANG_API_URL);
        assert!(!config.lambda_runtime);
    }

    #[test]
    fn test_reads_keys_and_overrides() {
        let config = config_from(&[
            ("PORT", "8080"),
            ("TABLE_NAME", "sweats-prod"),
            ("HYPIXEL_API_KEY", "hk"),
            ("URCHIN_API_KEY", "uk"),
            ("SWEATS_STORE", "memory"),
            ("URCHIN_API_URL", "http://127.0.0.1:1234"),
        ]);
        assert_eq!(config.port, 8080);
        assert_eq!(config.table_name, "sweats-prod");
        assert_eq!(config.hypixel_api_key.as_deref(), Some("hk"));
        assert_eq!(config.urchin_api_key.as_deref(), Some("uk"));
        assert_eq!(config.store, StoreKind::Memory);
        assert_eq!(config.urchin_api_url, "http://127.0.0.1:1234");
    }

    #[test]
    fn test_blank_values_count_as_missing() {
        let config = config_from(&[("HYPIXEL_API_KEY", "   "), ("PORT", "not-a-port")]);
        assert!(config.hypixel_api_key.is_none());
        assert_eq!(config.port, DEFAULT_PORT);
    }
}
