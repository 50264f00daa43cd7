use thiserror::Error;

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Validation error: {0}")]
    ValidationError(String),
    #[error("Could not resolve user {user}: {reason}")]
    LookupFailure { user: String, reason: String },
    #[error("Store error: {0}")]
    StoreFailure(String),
    #[error("Intent with name {0} not supported")]
    UnsupportedIntent(String),
    #[error("Malformed request: {0}")]
    MalformedRequest(String),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[cfg(feature = "storage-rocksdb")]
    #[error("RocksDB error: {0}")]
    RocksDbError(#[from] rocksdb::Error),
    #[error("Internal error: {0}")]
    InternalError(Box<dyn std::error::Error + Send + Sync>),
}

impl LedgerError {
    pub fn lookup(user: impl Into<String>, reason: impl ToString) -> Self {
        Self::LookupFailure {
            user: user.into(),
            reason: reason.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, LedgerError>;
