use std::sync::Arc;
use sweats::config::{Config, StoreKind};
use sweats::data::dynamodb::Db;
use sweats::data::memory::MemoryStore;
use sweats::data::store::SweatStore;
use sweats::upstream::Upstream;

/// Application state shared across all requests.
/// Nothing in here is mutated per request; the store and the HTTP client handle their own
/// concurrency.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn SweatStore>,
    pub upstream: Arc<Upstream>,
}

impl AppState {
    pub async fn new(config: &Config) -> Self {
        let store: Arc<dyn SweatStore> = match config.store {
            StoreKind::DynamoDb => Arc::new(Db::new(config).await),
            StoreKind::Memory => {
                tracing::warn!("Using the in-memory store, records will not survive a restart");
                Arc::new(MemoryStore::new())
            }
        };
        Self::with_store(store, Upstream::new(config))
    }

    pub fn with_store(store: Arc<dyn SweatStore>, upstream: Upstream) -> Self {
        Self {
            store,
            upstream: Arc::new(upstream),
        }
    }
}
