//! Thin forwarding clients for the third-party player APIs.
//!
//! Each call carries its own timeout and is never retried. Successful bodies are handed back
//! verbatim as JSON.

pub mod hypixel;
pub mod mojang;
pub mod urchin;

use crate::config::Config;
use crate::error::{Result, UpstreamError};
use reqwest::{RequestBuilder, StatusCode};
use serde_json::Value;
use std::time::Duration;

pub use urchin::TagLookup;

pub struct Upstream {
    client: reqwest::Client,
    mojang_api_url: String,
    hypixel_api_url: String,
    urchin_api_url: String,
    hypixel_api_key: Option<String>,
    urchin_api_key: Option<String>,
}

impl Upstream {
    pub fn new(config: &Config) -> Self {
        Self::with_client(reqwest::Client::new(), config)
    }

    pub fn with_client(client: reqwest::Client, config: &Config) -> Self {
        let trim = |url: &str| url.trim_end_matches('/').to_string();
        Self {
            client,
            mojang_api_url: trim(&config.mojang_api_url),
            hypixel_api_url: trim(&config.hypixel_api_url),
            urchin_api_url: trim(&config.urchin_api_url),
            hypixel_api_key: config.hypixel_api_key.clone(),
            urchin_api_key: config.urchin_api_key.clone(),
        }
    }

    /// Sends the request and decodes a JSON body. `204` and `404` both mean there is nothing
    /// to return; every other non-2xx status is an error carrying the upstream body.
    async fn get_json(&self, request: RequestBuilder, timeout: Duration) -> Result<Value> {
        let response = request.timeout(timeout).send().await?;
        let status = response.status();
        if status == StatusCode::NO_CONTENT || status == StatusCode::NOT_FOUND {
            return Err(UpstreamError::NotFound);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(UpstreamError::Status { status, body });
        }
        Ok(response.json().await?)
    }
}
