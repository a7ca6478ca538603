//! Preprocessing error types

use thiserror::Error;

/// Preprocessing errors
#[derive(Debug, Error, PartialEq)]
pub enum PreprocessError {
    #[error("Empty data: {0}")]
    EmptyData(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Feature mismatch: expected {expected} features, got {got}")]
    FeatureMismatch { expected: usize, got: usize },

    #[error("Too few samples ({samples}) for test ratio {test_ratio}")]
    TooFewSamples { samples: usize, test_ratio: f64 },
}

/// Result type for preprocessing operations
pub type Result<T> = std::result::Result<T, PreprocessError>;
