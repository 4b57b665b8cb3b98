use thiserror::Error;

/// The only error storage produces. Both reads and writes fail with it.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("storage is unavailable: {0}")]
    Io(#[from] std::io::Error),
    #[error("stored value is malformed: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("invalid storage key {0:?}")]
    InvalidKey(String),
}
