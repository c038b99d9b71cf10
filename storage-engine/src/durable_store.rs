use async_trait::async_trait;
use chrono::Utc;
use shared::Result;
use std::sync::Arc;
use strata::domain::Record;
use strata::ports::{RecordRepository, StorageBackend};
use uuid::Uuid;

/// Durable tier: the authoritative key -> payload store, reached through the
/// narrow record repository contract. Records here never expire.
pub struct DurableStore {
    repo: Arc<dyn RecordRepository>,
}

impl DurableStore {
    pub fn new(repo: Arc<dyn RecordRepository>) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl StorageBackend for DurableStore {
    /// Insert a new record or replace the payload of an existing one.
    /// Re-applying the same save is safe, which the retry wrapper relies on.
    async fn save(&self, key: Uuid, payload: &str) -> Result<()> {
        match self.repo.find_by_key(key).await? {
            Some(mut record) => {
                record.payload = payload.to_owned();
                record.updated_at = Some(Utc::now());
                self.repo.update(record).await?;
            }
            None => {
                self.repo.insert(Record::new(key, payload)).await?;
            }
        }
        self.repo.persist().await
    }

    async fn read(&self, key: Uuid) -> Result<Option<String>> {
        Ok(self.repo.find_by_key(key).await?.map(|record| record.payload))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sled_repository::SledRecordRepository;

    fn store() -> (tempfile::TempDir, DurableStore) {
        let temp_dir = tempfile::tempdir().unwrap();
        let repo = SledRecordRepository::new(temp_dir.path().join("records.sled")).unwrap();
        (temp_dir, DurableStore::new(Arc::new(repo)))
    }

    #[tokio::test]
    async fn save_then_read() {
        let (_guard, store) = store();
        let key = Uuid::new_v4();

        store.save(key, "payload").await.unwrap();
        assert_eq!(store.read(key).await.unwrap().as_deref(), Some("payload"));
    }

    #[tokio::test]
    async fn read_missing_key_is_absent() {
        let (_guard, store) = store();

        assert!(store.read(Uuid::new_v4()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn save_over_existing_key_updates_in_place() {
        let (_guard, store) = store();
        let key = Uuid::new_v4();

        store.save(key, "first").await.unwrap();
        store.save(key, "second").await.unwrap();

        assert_eq!(store.read(key).await.unwrap().as_deref(), Some("second"));
    }

    #[tokio::test]
    async fn update_stamps_updated_at_and_keeps_created_at() {
        let (_guard, store) = store();
        let key = Uuid::new_v4();

        store.save(key, "first").await.unwrap();
        let created = store.repo.find_by_key(key).await.unwrap().unwrap();
        assert!(created.updated_at.is_none());

        store.save(key, "second").await.unwrap();
        let updated = store.repo.find_by_key(key).await.unwrap().unwrap();
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at.is_some());
    }

    #[tokio::test]
    async fn repeated_save_is_idempotent() {
        let (_guard, store) = store();
        let key = Uuid::new_v4();

        store.save(key, "payload").await.unwrap();
        store.save(key, "payload").await.unwrap();

        assert_eq!(store.read(key).await.unwrap().as_deref(), Some("payload"));
    }
}
