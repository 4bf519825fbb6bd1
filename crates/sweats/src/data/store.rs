use crate::data::error::{DataError, Result};
use crate::data::types::sweat_record::{NewSweat, SweatPatch, SweatRecord};
use async_trait::async_trait;
use ulid::Ulid;

/// Persistence for sweat records. Every operation touches a single document.
#[async_trait]
pub trait SweatStore: Send + Sync {
    /// All records, newest first.
    async fn list_sweats(&self) -> Result<Vec<SweatRecord>>;

    /// Persists a new record and returns it as stored.
    async fn create_sweat(&self, input: NewSweat) -> Result<SweatRecord>;

    /// Removes a record, returning its id. Unknown ids are `DocumentNotFound`.
    async fn delete_sweat(&self, id: &str) -> Result<String>;

    /// Applies a restricted update and returns the updated record.
    async fn update_sweat(&self, id: &str, patch: &SweatPatch) -> Result<SweatRecord>;
}

/// Ids are ULIDs; anything that doesn't parse can't exist in the store.
pub fn parse_id(id: &str) -> Result<Ulid> {
    Ulid::from_string(id).map_err(|_| DataError::DocumentNotFound)
}

pub fn sort_newest_first(records: &mut [SweatRecord]) {
    records.sort_by(|a, b| {
        b.created_ts
            .cmp(&a.created_ts)
            .then_with(|| b.sk.cmp(&a.sk))
    });
}
