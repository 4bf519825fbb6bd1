//! Test doubles: local fake upstream services and a store that always fails.

use crate::config::Config;
use crate::data::error::{DataError, Result};
use crate::data::store::SweatStore;
use crate::data::types::sweat_record::{NewSweat, SweatPatch, SweatRecord};
use async_trait::async_trait;
use axum::Router;

/// Serves `router` on an ephemeral local port and returns its base URL.
pub async fn spawn_upstream(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

/// A config pointing every upstream at `base_url`, with both keys set.
pub fn config_for(base_url: &str) -> Config {
    Config {
        mojang_api_url: base_url.to_string(),
        hypixel_api_url: base_url.to_string(),
        urchin_api_url: base_url.to_string(),
        hypixel_api_key: Some("hypixel-key".to_string()),
        urchin_api_key: Some("urchin-key".to_string()),
        ..Default::default()
    }
}

/// Nothing listens on port 1, so every call is refused.
pub const REFUSED_URL: &str = "http://127.0.0.1:1";

/// A store whose backend is unreachable: every operation fails with a storage error.
pub struct FailingStore;

fn offline() -> DataError {
    DataError::SerdeDynamoError(serde::de::Error::custom("store offline"))
}

#[async_trait]
impl SweatStore for FailingStore {
    async fn list_sweats(&self) -> Result<Vec<SweatRecord>> {
        Err(offline())
    }

    async fn create_sweat(&self, _input: NewSweat) -> Result<SweatRecord> {
        Err(offline())
    }

    async fn delete_sweat(&self, _id: &str) -> Result<String> {
        Err(offline())
    }

    async fn update_sweat(&self, _id: &str, _patch: &SweatPatch) -> Result<SweatRecord> {
        Err(offline())
    }
}
