use crate::data::error::{DataError, Result};
use crate::data::store::{SweatStore, parse_id, sort_newest_first};
use crate::data::types::sweat_record::{NewSweat, SweatPatch, SweatRecord};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;
use ulid::Ulid;

/// In-process store. Used by tests and by local runs with `SWEATS_STORE=memory`.
#[derive(Default)]
pub struct MemoryStore {
    records: RwLock<HashMap<Ulid, SweatRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a record as-is, bypassing creation defaults.
    #[cfg(test)]
    pub async fn insert(&self, id: Ulid, record: SweatRecord) {
        self.records.write().await.insert(id, record);
    }
}

#[async_trait]
impl SweatStore for MemoryStore {
    async fn list_sweats(&self) -> Result<Vec<SweatRecord>> {
        let mut records: Vec<SweatRecord> = self.records.read().await.values().cloned().collect();
        sort_newest_first(&mut records);
        Ok(records)
    }

    async fn create_sweat(&self, input: NewSweat) -> Result<SweatRecord> {
        let id = Ulid::new();
        let record = SweatRecord::create(input, id, Utc::now())?;
        self.records.write().await.insert(id, record.clone());
        Ok(record)
    }

    async fn delete_sweat(&self, id: &str) -> Result<String> {
        let key = parse_id(id)?;
        match self.records.write().await.remove(&key) {
            Some(_) => Ok(key.to_string()),
            None => Err(DataError::DocumentNotFound),
        }
    }

    async fn update_sweat(&self, id: &str, patch: &SweatPatch) -> Result<SweatRecord> {
        let key = parse_id(id)?;
        let mut records = self.records.write().await;
        let record = records.get_mut(&key).ok_or(DataError::DocumentNotFound)?;
        patch.apply(record);
        Ok(record.clone())
    }
}
