use std::path::{Path, PathBuf};
use std::time::Duration;

pub struct Config {
    pub host: String,
    pub http_port: u16,
    pub data_dir: String,
    pub cache_ttl: Duration,
    pub file_retention: Duration,
}

impl Config {
    const DEFAULT_DATA_DIR: &str = "./data";
    const DEFAULT_CACHE_TTL_SECS: u64 = 600;
    const DEFAULT_FILE_RETENTION_SECS: u64 = 1800;

    pub fn from_env() -> Self {
        let host = std::env::var("STRATA_HOST").unwrap_or_else(|_| "localhost".to_string());
        let http_port = std::env::var("STRATA_HTTP_PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse::<u16>()
            .unwrap_or(8080);
        let cache_ttl_secs = std::env::var("STRATA_CACHE_TTL_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(Self::DEFAULT_CACHE_TTL_SECS);
        let file_retention_secs = std::env::var("STRATA_FILE_RETENTION_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(Self::DEFAULT_FILE_RETENTION_SECS);
        Self {
            host,
            http_port,
            data_dir: std::env::var("STRATA_DATA_DIR")
                .unwrap_or_else(|_| Self::DEFAULT_DATA_DIR.to_string()),
            cache_ttl: Duration::from_secs(cache_ttl_secs),
            file_retention: Duration::from_secs(file_retention_secs),
        }
    }

    /// Directory holding the file tier's entry files
    pub fn file_dir(&self) -> PathBuf {
        Path::new(&self.data_dir).join("files")
    }

    /// Path of the durable record database
    pub fn records_path(&self) -> PathBuf {
        Path::new(&self.data_dir).join("records.sled")
    }
}
