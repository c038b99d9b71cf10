use async_trait::async_trait;
use moka::future::Cache;
use std::fmt::Debug;
use std::time::Duration;
use strata::ports::FastCache;

/// Moka-based fast tier.
/// Lock-free concurrent cache; every insert gets the absolute TTL the cache
/// was built with, independent of the file tier's retention clock.
pub struct MokaCache {
    cache: Cache<String, String>,
}

impl MokaCache {
    /// Create a named cache whose entries expire `ttl` after each write
    pub fn new(name: &str, ttl: Duration) -> Self {
        let cache = Cache::builder().name(name).time_to_live(ttl).build();

        Self { cache }
    }
}

#[async_trait]
impl FastCache for MokaCache {
    async fn get(&self, key: &str) -> Option<String> {
        // None covers both "never written" and "TTL expired"
        self.cache.get(key).await
    }

    async fn insert(&self, key: String, payload: String) {
        self.cache.insert(key, payload).await;
    }
}

impl Debug for MokaCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MokaCache")
            .field("entry_count", &self.cache.entry_count())
            .field("weighted_size", &self.cache.weighted_size())
            .finish()
    }
}
