use async_trait::async_trait;
use shared::{Error, Result};
use sled::Db;
use std::path::Path;
use strata::domain::Record;
use strata::ports::RecordRepository;
use uuid::Uuid;

const RECORDS_TREE: &str = "records";

/// Sled-backed record repository.
/// Records are stored in a dedicated tree keyed by the raw UUID bytes, with
/// JSON values.
#[derive(Clone)]
pub struct SledRecordRepository {
    db: Db,
}

impl SledRecordRepository {
    /// Open the database, creating the parent directory if it doesn't exist
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| Error::Storage(format!("failed to create directory: {e}")))?;
        }

        let db = sled::open(path)
            .map_err(|e| Error::Storage(format!("failed to open sled database: {e}")))?;

        Ok(Self { db })
    }

    fn records_tree(&self) -> Result<sled::Tree> {
        self.db
            .open_tree(RECORDS_TREE)
            .map_err(|e| Error::Storage(e.to_string()))
    }

    fn put_record(&self, record: &Record) -> Result<()> {
        let tree = self.records_tree()?;
        let value = serde_json::to_vec(record)
            .map_err(|e| Error::Internal(format!("failed to serialize record: {e}")))?;

        tree.insert(record.key.as_bytes(), value)
            .map_err(|e| Error::Storage(e.to_string()))?;

        Ok(())
    }
}

#[async_trait]
impl RecordRepository for SledRecordRepository {
    async fn find_by_key(&self, key: Uuid) -> Result<Option<Record>> {
        let tree = self.records_tree()?;

        match tree
            .get(key.as_bytes())
            .map_err(|e| Error::Storage(e.to_string()))?
        {
            Some(bytes) => {
                let record = serde_json::from_slice(&bytes)
                    .map_err(|e| Error::MalformedEntry(e.to_string()))?;
                Ok(Some(record))
            }
            None => Ok(None),
        }
    }

    async fn insert(&self, record: Record) -> Result<()> {
        self.put_record(&record)
    }

    async fn update(&self, record: Record) -> Result<()> {
        self.put_record(&record)
    }

    async fn persist(&self) -> Result<()> {
        self.db
            .flush()
            .map(|_| ())
            .map_err(|e| Error::Storage(e.to_string()))
    }
}
