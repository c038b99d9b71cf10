use crate::domain::TierKind;
use crate::ports::{FastCache, StorageFactory};
use crate::retry::RetryPolicy;
use shared::Result;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};
use uuid::Uuid;

// File I/O faults are expected to clear quickly, so reads retry immediately.
const FILE_READ_ATTEMPTS: u32 = 3;
// Durable-store faults are costlier; retries are spaced exponentially.
const DURABLE_ATTEMPTS: u32 = 3;
const DURABLE_BACKOFF_BASE: Duration = Duration::from_millis(100);

/// Orchestrates the cache -> file -> durable read fallback chain and the
/// fan-out write path across all three tiers.
pub struct TieredAccessService {
    cache: Arc<dyn FastCache>,
    tiers: Arc<dyn StorageFactory>,
}

impl TieredAccessService {
    pub fn new(cache: Arc<dyn FastCache>, tiers: Arc<dyn StorageFactory>) -> Self {
        Self { cache, tiers }
    }

    /// Read a payload, falling back through the tiers and repopulating the
    /// faster ones on the way back up. A durable-tier miss is authoritative
    /// absence; tier faults degrade to misses once retries exhaust.
    pub async fn get(&self, key: Uuid) -> Option<String> {
        let cache_key = cache_key(key);

        if let Some(payload) = self.cache.get(&cache_key).await {
            debug!(%key, "cache hit");
            return Some(payload);
        }

        let file = self.tiers.resolve(TierKind::File);
        let file_read = RetryPolicy::immediate(FILE_READ_ATTEMPTS)
            .run(|| {
                let store = Arc::clone(&file);
                async move { store.read(key).await }
            })
            .await;
        match file_read {
            Ok(Some(payload)) => {
                info!(%key, "file hit");
                self.cache.insert(cache_key, payload.clone()).await;
                return Some(payload);
            }
            Ok(None) => {}
            Err(err) => warn!(%key, %err, "file tier read failed, falling back"),
        }

        let durable = self.tiers.resolve(TierKind::Durable);
        let durable_read = RetryPolicy::exponential(DURABLE_ATTEMPTS, DURABLE_BACKOFF_BASE)
            .run(|| {
                let store = Arc::clone(&durable);
                async move { store.read(key).await }
            })
            .await;
        match durable_read {
            Ok(Some(payload)) => {
                info!(%key, "durable hit");
                self.warm_file_tier(key, payload.clone());
                self.cache.insert(cache_key, payload.clone()).await;
                Some(payload)
            }
            Ok(None) => None,
            Err(err) => {
                warn!(%key, %err, "durable tier read failed");
                None
            }
        }
    }

    /// Write through every tier: durable store first, then the file tier,
    /// then the fast cache. The cache is only touched after the slower
    /// writes have committed, so a failed call leaves it unchanged.
    pub async fn put(&self, key: Uuid, payload: &str) -> Result<()> {
        let durable = self.tiers.resolve(TierKind::Durable);
        let body = payload.to_owned();
        RetryPolicy::exponential(DURABLE_ATTEMPTS, DURABLE_BACKOFF_BASE)
            .run(|| {
                let store = Arc::clone(&durable);
                let body = body.clone();
                async move { store.save(key, &body).await }
            })
            .await?;

        // the file tier retries its own writes
        let file = self.tiers.resolve(TierKind::File);
        file.save(key, payload).await?;

        self.cache.insert(cache_key(key), payload.to_owned()).await;
        Ok(())
    }

    /// Detached best-effort file-tier warm-up after a durable hit; failures
    /// are drained into the log and never reach the caller.
    fn warm_file_tier(&self, key: Uuid, payload: String) {
        let file = self.tiers.resolve(TierKind::File);
        tokio::spawn(async move {
            if let Err(err) = file.save(key, &payload).await {
                warn!(%key, %err, "file tier warm-up failed");
            }
        });
    }
}

/// Fast-cache keys are namespaced so record payloads never collide with
/// unrelated cached data.
fn cache_key(key: Uuid) -> String {
    format!("record:{key}")
}
