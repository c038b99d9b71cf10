use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::{Error, Result};
use std::path::PathBuf;
use std::time::Duration;
use strata::ports::StorageBackend;
use strata::retry::RetryPolicy;
use tokio::fs;
use tracing::{debug, warn};
use uuid::Uuid;

const FILENAME_MARKER: &str = "_expires_";
const FILENAME_SUFFIX: &str = ".json";
// Fixed-width UTC stamp so names sort lexicographically by expiry
const EXPIRY_FORMAT: &str = "%Y%m%d%H%M%S";

const WRITE_ATTEMPTS: u32 = 3;
const WRITE_BACKOFF_BASE: Duration = Duration::from_millis(100);

/// On-disk entry body. The filename repeats the key and expiry so candidates
/// can be enumerated and ordered without opening them.
#[derive(Debug, Serialize, Deserialize)]
struct FileEntry {
    key: Uuid,
    expires_at: DateTime<Utc>,
    payload: String,
}

/// Filesystem tier: one new entry file per write, never mutated in place.
/// Expired entries are collected lazily by reads for the same key; there is
/// no background sweep.
pub struct FileStore {
    dir: PathBuf,
    retention: chrono::Duration,
}

impl FileStore {
    /// Open the store, creating the directory if needed
    pub fn new(dir: impl Into<PathBuf>, retention: Duration) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)
            .map_err(|e| Error::Storage(format!("failed to create file tier directory: {e}")))?;
        let retention = chrono::Duration::from_std(retention)
            .map_err(|e| Error::Internal(format!("retention out of range: {e}")))?;

        Ok(Self { dir, retention })
    }

    fn entry_path(&self, key: Uuid, expires_at: DateTime<Utc>) -> PathBuf {
        self.dir.join(format!(
            "{key}{FILENAME_MARKER}{}{FILENAME_SUFFIX}",
            expires_at.format(EXPIRY_FORMAT)
        ))
    }

    /// Expiry encoded in a candidate's filename, if the name matches the
    /// entry scheme for `key`
    fn expiry_from_name(name: &str, key: Uuid) -> Option<DateTime<Utc>> {
        let stamp = name
            .strip_prefix(&format!("{key}{FILENAME_MARKER}"))?
            .strip_suffix(FILENAME_SUFFIX)?;
        NaiveDateTime::parse_from_str(stamp, EXPIRY_FORMAT)
            .ok()
            .map(|naive| naive.and_utc())
    }

    async fn write_entry(&self, key: Uuid, payload: &str, expires_at: DateTime<Utc>) -> Result<()> {
        let entry = FileEntry {
            key,
            expires_at,
            payload: payload.to_owned(),
        };
        let body = serde_json::to_vec(&entry)
            .map_err(|e| Error::Internal(format!("failed to serialize entry: {e}")))?;
        let path = self.entry_path(key, expires_at);
        fs::write(&path, body).await?;
        debug!(path = %path.display(), "wrote file tier entry");
        Ok(())
    }

    /// Candidate entry files for `key`, latest encoded expiry first
    async fn candidates(&self, key: Uuid) -> Result<Vec<(DateTime<Utc>, PathBuf)>> {
        let mut found = Vec::new();
        let mut entries = fs::read_dir(&self.dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let name = entry.file_name();
            let Some(name) = name.to_str() else { continue };
            if let Some(expires_at) = Self::expiry_from_name(name, key) {
                found.push((expires_at, entry.path()));
            }
        }
        found.sort_by(|a, b| b.0.cmp(&a.0));
        Ok(found)
    }

    fn parse_entry(bytes: &[u8]) -> Result<FileEntry> {
        serde_json::from_slice(bytes).map_err(|e| Error::MalformedEntry(e.to_string()))
    }
}

#[async_trait]
impl StorageBackend for FileStore {
    /// Write a fresh entry expiring `retention` from now. Filesystem writes
    /// can fail transiently under contention, so they retry with backoff.
    async fn save(&self, key: Uuid, payload: &str) -> Result<()> {
        let expires_at = Utc::now() + self.retention;
        RetryPolicy::exponential(WRITE_ATTEMPTS, WRITE_BACKOFF_BASE)
            .run(|| self.write_entry(key, payload, expires_at))
            .await
    }

    /// Return the payload of the latest still-valid entry for `key`.
    /// Every expired candidate encountered in the scan is deleted
    /// best-effort; a racing reader may already have removed it.
    async fn read(&self, key: Uuid) -> Result<Option<String>> {
        let candidates = self.candidates(key).await?;
        let now = Utc::now();
        let mut winner = None;

        for (name_expiry, path) in candidates {
            if name_expiry < now {
                let _ = fs::remove_file(&path).await;
                continue;
            }
            if winner.is_some() {
                continue;
            }
            let bytes = match fs::read(&path).await {
                Ok(bytes) => bytes,
                Err(err) => {
                    warn!(path = %path.display(), %err, "failed to read entry file, skipping");
                    continue;
                }
            };
            match Self::parse_entry(&bytes) {
                // the body is authoritative if it disagrees with the name
                Ok(entry) if entry.expires_at < now => {
                    let _ = fs::remove_file(&path).await;
                }
                Ok(entry) => winner = Some(entry.payload),
                Err(err) => {
                    warn!(path = %path.display(), %err, "skipping malformed entry file");
                }
            }
        }

        Ok(winner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn store(dir: &std::path::Path) -> FileStore {
        FileStore::new(dir, Duration::from_secs(3600)).unwrap()
    }

    #[tokio::test]
    async fn save_then_read_round_trip() {
        let dir = tempdir().unwrap();
        let store = store(dir.path());
        let key = Uuid::new_v4();

        store.save(key, "payload").await.unwrap();
        assert_eq!(store.read(key).await.unwrap().as_deref(), Some("payload"));
    }

    #[tokio::test]
    async fn read_of_unwritten_key_is_absent() {
        let dir = tempdir().unwrap();
        let store = store(dir.path());

        assert!(store.read(Uuid::new_v4()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn keys_do_not_leak_into_each_other() {
        let dir = tempdir().unwrap();
        let store = store(dir.path());
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();

        store.save(a, "payload-a").await.unwrap();
        assert!(store.read(b).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn latest_entry_wins() {
        let dir = tempdir().unwrap();
        let store = store(dir.path());
        let key = Uuid::new_v4();
        let now = Utc::now();

        store
            .write_entry(key, "older", now + chrono::Duration::hours(1))
            .await
            .unwrap();
        store
            .write_entry(key, "newer", now + chrono::Duration::hours(2))
            .await
            .unwrap();

        assert_eq!(store.read(key).await.unwrap().as_deref(), Some("newer"));
    }

    #[tokio::test]
    async fn expired_sibling_is_deleted_while_valid_entry_is_served() {
        let dir = tempdir().unwrap();
        let store = store(dir.path());
        let key = Uuid::new_v4();
        let now = Utc::now();

        let expired_at = now - chrono::Duration::hours(1);
        store.write_entry(key, "stale", expired_at).await.unwrap();
        store
            .write_entry(key, "fresh", now + chrono::Duration::hours(1))
            .await
            .unwrap();

        assert_eq!(store.read(key).await.unwrap().as_deref(), Some("fresh"));
        assert!(!store.entry_path(key, expired_at).exists());
    }

    #[tokio::test]
    async fn all_expired_entries_yield_absent_and_are_deleted() {
        let dir = tempdir().unwrap();
        let store = store(dir.path());
        let key = Uuid::new_v4();
        let now = Utc::now();

        store
            .write_entry(key, "stale", now - chrono::Duration::hours(2))
            .await
            .unwrap();
        store
            .write_entry(key, "staler", now - chrono::Duration::hours(1))
            .await
            .unwrap();

        assert!(store.read(key).await.unwrap().is_none());
        assert!(store.candidates(key).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn corrupt_entry_is_skipped_without_failing_the_read() {
        let dir = tempdir().unwrap();
        let store = store(dir.path());
        let key = Uuid::new_v4();
        let expires_at = Utc::now() + chrono::Duration::hours(1);

        fs::write(store.entry_path(key, expires_at), b"not json")
            .await
            .unwrap();

        assert!(store.read(key).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn corrupt_entry_falls_back_to_older_valid_entry() {
        let dir = tempdir().unwrap();
        let store = store(dir.path());
        let key = Uuid::new_v4();
        let now = Utc::now();

        store
            .write_entry(key, "good", now + chrono::Duration::hours(1))
            .await
            .unwrap();
        fs::write(
            store.entry_path(key, now + chrono::Duration::hours(2)),
            b"not json",
        )
        .await
        .unwrap();

        assert_eq!(store.read(key).await.unwrap().as_deref(), Some("good"));
    }

    #[tokio::test]
    async fn each_save_creates_a_distinct_file() {
        let dir = tempdir().unwrap();
        let store = store(dir.path());
        let key = Uuid::new_v4();
        let now = Utc::now();

        store
            .write_entry(key, "first", now + chrono::Duration::hours(1))
            .await
            .unwrap();
        store
            .write_entry(key, "second", now + chrono::Duration::hours(2))
            .await
            .unwrap();

        assert_eq!(store.candidates(key).await.unwrap().len(), 2);
    }
}
