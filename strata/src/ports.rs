#![deny(clippy::all)]

use crate::domain::{Record, TierKind};
use async_trait::async_trait;
use shared::Result;
use std::sync::Arc;
use uuid::Uuid;

// Ports are the pluggable extension points for the underlying storage tiers

/// Port for resolving the backend that serves a given tier
pub trait StorageFactory: Send + Sync + 'static {
    fn resolve(&self, kind: TierKind) -> Arc<dyn StorageBackend>;
}

/// Common save/read contract implemented by every persistence tier.
///
/// `read` never fails for absence: `Ok(None)` is the normal miss result and
/// only I/O-level faults surface as errors.
#[async_trait]
pub trait StorageBackend: Send + Sync + 'static {
    async fn save(&self, key: Uuid, payload: &str) -> Result<()>;
    async fn read(&self, key: Uuid) -> Result<Option<String>>;
}

/// Port for the fast cache tier (namespaced string keys)
#[async_trait]
pub trait FastCache: Send + Sync + 'static {
    async fn get(&self, key: &str) -> Option<String>;
    async fn insert(&self, key: String, payload: String);
}

/// Narrow CRUD contract to the durable record layer
#[async_trait]
pub trait RecordRepository: Send + Sync + 'static {
    /// Find a record by its key
    async fn find_by_key(&self, key: Uuid) -> Result<Option<Record>>;

    /// Add a new record
    async fn insert(&self, record: Record) -> Result<()>;

    /// Replace an existing record
    async fn update(&self, record: Record) -> Result<()>;

    /// Flush pending changes to the underlying medium
    async fn persist(&self) -> Result<()>;
}
