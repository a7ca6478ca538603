//! Classifier error types

use thiserror::Error;

/// Classifier errors
#[derive(Debug, Error, PartialEq)]
pub enum ClassifierError {
    #[error("Select other model: {0:?} is not one of logreg, svc")]
    InvalidVariant(String),

    #[error("Bad params: {0}")]
    InvalidHyperparameters(String),

    #[error("Model is not fitted")]
    NotFitted,

    #[error("Shape mismatch: expected {expected}, got {got}")]
    ShapeMismatch { expected: String, got: String },

    #[error("Cannot fit with zero samples")]
    EmptyData,

    #[error("Labels must be 0 or 1, found {0}")]
    NonBinaryLabels(f64),

    #[error("Training data holds a single class; need samples of both 0 and 1")]
    SingleClass,

    #[error("Fit diverged: {0}")]
    Diverged(String),
}

/// Result type for classifier operations
pub type Result<T> = std::result::Result<T, ClassifierError>;
