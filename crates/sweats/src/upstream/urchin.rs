use super::Upstream;
use crate::error::{Result, UpstreamError};
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

pub const URCHIN_TIMEOUT: Duration = Duration::from_secs(5);
/// Only manually reviewed tags are requested.
pub const URCHIN_SOURCES: &str = "MANUAL";

/// Outcome of a tag lookup that is not allowed to fail.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum TagLookup {
    /// The upstream body, untouched.
    Found(Value),
    /// The tagging service could not answer; `error` says why.
    Fallback { error: String, username: String },
}

impl Upstream {
    /// Looks up a player's tags, surfacing every failure.
    pub async fn lookup_tags(&self, username: &str) -> Result<Value> {
        let key = self
            .urchin_api_key
            .as_deref()
            .ok_or(UpstreamError::MissingApiKey("URCHIN_API_KEY"))?;
        let request = self
            .client
            .get(format!(
                "{}/player/{}",
                self.urchin_api_url,
                urlencoding::encode(username)
            ))
            .query(&[("key", key), ("sources", URCHIN_SOURCES)]);
        self.get_json(request, URCHIN_TIMEOUT).await
    }

    /// Looks up a player's tags, turning any failure into [`TagLookup::Fallback`].
    pub async fn lookup_tags_or_fallback(&self, username: &str) -> TagLookup {
        match self.lookup_tags(username).await {
            Ok(body) => TagLookup::Found(body),
            Err(err) => {
                tracing::warn!(username, "Urchin lookup failed, using fallback: {err}");
                TagLookup::Fallback {
                    error: err.to_string(),
                    username: username.to_string(),
                }
            }
        }
    }
}

/// Joins the tag types in an Urchin player body into one comma-separated string.
/// Returns `None` when the body carries no tags.
pub fn tag_summary(body: &Value) -> Option<String> {
    let tags = body.get("tags")?.as_array()?;
    let names: Vec<&str> = tags
        .iter()
        .filter_map(|tag| match tag {
            Value::String(name) => Some(name.as_str()),
            Value::Object(fields) => fields.get("type").and_then(Value::as_str),
            _ => None,
        })
        .filter(|name| !name.is_empty())
        .collect();
    if names.is_empty() {
        None
    } else {
        Some(names.join(", "))
    }
}
