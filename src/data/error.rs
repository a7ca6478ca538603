//! Dataset error types

use thiserror::Error;

/// Dataset errors
#[derive(Debug, Error)]
pub enum DataError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Schema mismatch: missing columns {missing:?}, unexpected columns {unexpected:?}")]
    Schema { missing: Vec<String>, unexpected: Vec<String> },

    #[error("Invalid label {value} at row {row}: expected 0 or 1")]
    InvalidLabel { row: usize, value: i64 },

    #[error("Dataset is empty")]
    Empty,

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Dataset source unavailable: {0}")]
    Source(String),
}

/// Result type for dataset operations
pub type Result<T> = std::result::Result<T, DataError>;
