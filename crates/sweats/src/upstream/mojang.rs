use super::Upstream;
use crate::error::Result;
use serde_json::Value;
use std::time::Duration;

pub const MOJANG_TIMEOUT: Duration = Duration::from_secs(10);

impl Upstream {
    /// Resolves a username to `{id, name}`. Unknown players are `UpstreamError::NotFound`.
    pub async fn lookup_profile(&self, username: &str) -> Result<Value> {
        let url = format!(
            "{}/users/profiles/minecraft/{}",
            self.mojang_api_url,
            urlencoding::encode(username)
        );
        self.get_json(self.client.get(url), MOJANG_TIMEOUT).await
    }
}
