//! Storage error types

use thiserror::Error;

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Storage backend error: {0}")]
    Backend(String),

    #[error("Model not found: {0}")]
    ModelNotFound(String),

    #[error("Dataset snapshot not found: {0}")]
    SnapshotNotFound(String),

    #[error("Model {id} was modified concurrently (expected version {expected_version})")]
    Conflict { id: String, expected_version: i64 },

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type for storage operations
pub type Result<T> = std::result::Result<T, StorageError>;
