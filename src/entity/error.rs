//! Model entity error types

use crate::classify::ClassifierError;
use thiserror::Error;
use uuid::Uuid;

/// Model entity errors
#[derive(Debug, Error)]
pub enum EntityError {
    #[error("Select other model: {0:?} is not one of logreg, svc")]
    InvalidVariant(String),

    #[error("Bad params: {0}")]
    InvalidHyperparameters(String),

    #[error("Dataset unavailable: {0}")]
    DataUnavailable(String),

    #[error("Model {0} is not trained")]
    NotTrained(Uuid),

    #[error("Fit failed: {0}")]
    Fit(ClassifierError),

    #[error("Prediction failed: {0}")]
    Predict(ClassifierError),

    #[error("Corrupt model state: {0}")]
    Corrupt(String),
}

impl From<ClassifierError> for EntityError {
    fn from(err: ClassifierError) -> Self {
        match err {
            ClassifierError::InvalidVariant(name) => EntityError::InvalidVariant(name),
            ClassifierError::InvalidHyperparameters(msg) => EntityError::InvalidHyperparameters(msg),
            other => EntityError::Fit(other),
        }
    }
}

/// Result type for entity operations
pub type Result<T> = std::result::Result<T, EntityError>;
