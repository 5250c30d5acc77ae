use thiserror::Error;

/// Result type for repository operations.
pub type Result<T> = std::result::Result<T, StorageError>;

#[derive(Debug, Clone, Error)]
pub enum CoreError {
    #[error("invalid short code: {0}")]
    InvalidShortCode(String),
}

/// Errors reported by a store backend.
#[derive(Debug, Clone, Error)]
pub enum StorageError {
    #[error("short code already exists: {0}")]
    Conflict(String),
    #[error("storage backend unavailable: {0}")]
    Unavailable(String),
    #[error("storage operation timed out: {0}")]
    Timeout(String),
    #[error("storage query failed: {0}")]
    Query(String),
    #[error("stored data is invalid: {0}")]
    InvalidData(String),
    #[error("storage operation failed: {0}")]
    Operation(String),
}

/// Errors surfaced by the short-code allocator.
#[derive(Debug, Clone, Error)]
pub enum ShortenerError {
    #[error("{0}")]
    Validation(String),
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),
    #[error("no free short code after {attempts} attempts")]
    GenerationExhausted { attempts: u32 },
}

impl From<StorageError> for ShortenerError {
    fn from(value: StorageError) -> Self {
        Self::StoreUnavailable(value.to_string())
    }
}

/// Errors surfaced by the redirect resolver.
///
/// A missing or expired code is not an error; it resolves to `None`.
#[derive(Debug, Clone, Error)]
pub enum RedirectorError {
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),
}

impl From<StorageError> for RedirectorError {
    fn from(value: StorageError) -> Self {
        Self::StoreUnavailable(value.to_string())
    }
}

#[derive(Debug, Clone, Error)]
pub enum ContactError {
    #[error("{0}")]
    Validation(String),
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}
