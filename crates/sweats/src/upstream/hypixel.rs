use super::Upstream;
use crate::error::{Result, UpstreamError};
use serde_json::Value;
use std::time::Duration;

pub const HYPIXEL_TIMEOUT: Duration = Duration::from_secs(15);

impl Upstream {
    /// Fetches the player's statistics. Fails without calling out when no key is configured.
    pub async fn lookup_player_stats(&self, uuid: &str) -> Result<Value> {
        let key = self
            .hypixel_api_key
            .as_deref()
            .ok_or(UpstreamError::MissingApiKey("HYPIXEL_API_KEY"))?;
        let request = self
            .client
            .get(format!("{}/v2/player", self.hypixel_api_url))
            .query(&[("uuid", uuid), ("key", key)]);
        self.get_json(request, HYPIXEL_TIMEOUT).await
    }
}
