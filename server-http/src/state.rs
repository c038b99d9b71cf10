use shared::config::Config;
use shared::Result;
use std::sync::Arc;
use storage_engine::{DurableStore, FileStore, MokaCache, SledRecordRepository, TierRegistry};
use strata::service::TieredAccessService;

/// Server state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<TieredAccessService>,
}

impl AppState {
    /// Wire the three storage tiers from configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        let cache = Arc::new(MokaCache::new("records", config.cache_ttl));
        let file = Arc::new(FileStore::new(config.file_dir(), config.file_retention)?);
        let repo = Arc::new(SledRecordRepository::new(config.records_path())?);
        let durable = Arc::new(DurableStore::new(repo));
        let registry = Arc::new(TierRegistry::new(file, durable));
        let service = Arc::new(TieredAccessService::new(cache, registry));

        Ok(Self { service })
    }
}
