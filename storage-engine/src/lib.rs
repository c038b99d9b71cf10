mod durable_store;
mod file_store;
mod moka_cache;
mod sled_repository;

pub use durable_store::DurableStore;
pub use file_store::FileStore;
pub use moka_cache::MokaCache;
pub use sled_repository::SledRecordRepository;

use std::sync::Arc;
use strata::domain::TierKind;
use strata::ports::{StorageBackend, StorageFactory};

/// Maps each tier selector to the backend wired in at startup
pub struct TierRegistry {
    file: Arc<dyn StorageBackend>,
    durable: Arc<dyn StorageBackend>,
}

impl TierRegistry {
    pub fn new(file: Arc<dyn StorageBackend>, durable: Arc<dyn StorageBackend>) -> Self {
        Self { file, durable }
    }
}

impl StorageFactory for TierRegistry {
    fn resolve(&self, kind: TierKind) -> Arc<dyn StorageBackend> {
        match kind {
            TierKind::File => Arc::clone(&self.file),
            TierKind::Durable => Arc::clone(&self.durable),
        }
    }
}
