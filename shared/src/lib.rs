// shared/src/lib.rs

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("storage: {0}")]
    Storage(String),
    #[error("malformed entry: {0}")]
    MalformedEntry(String),
    #[error("unknown tier: {0}")]
    UnknownTier(String),
    #[error("internal: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Storage(err.to_string())
    }
}

pub mod config;
