//! Caller-facing registry errors

use crate::classify::ClassifierError;
use crate::entity::EntityError;
use crate::storage::StorageError;
use thiserror::Error;

/// Errors surfaced by registry operations
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Select other model: {0:?} is not one of logreg, svc")]
    InvalidVariant(String),

    #[error("Bad params: {0}")]
    InvalidHyperparameters(String),

    #[error("Dataset unavailable: {0}")]
    DataUnavailable(String),

    #[error("Model {0} is not trained")]
    NotTrained(String),

    #[error("No such model")]
    NotFound(String),

    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Model {0} was modified concurrently, retry")]
    Conflict(String),

    #[error("Corrupt model state: {0}")]
    Corrupt(String),
}

impl From<StorageError> for RegistryError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Unavailable(msg) => RegistryError::StoreUnavailable(msg),
            StorageError::ModelNotFound(id) => RegistryError::NotFound(id),
            StorageError::Conflict { id, .. } => RegistryError::Conflict(id),
            other => RegistryError::Corrupt(other.to_string()),
        }
    }
}

impl From<EntityError> for RegistryError {
    fn from(err: EntityError) -> Self {
        match err {
            EntityError::InvalidVariant(name) => RegistryError::InvalidVariant(name),
            EntityError::InvalidHyperparameters(msg) => RegistryError::InvalidHyperparameters(msg),
            EntityError::DataUnavailable(msg) => RegistryError::DataUnavailable(msg),
            EntityError::NotTrained(id) => RegistryError::NotTrained(id.to_string()),
            EntityError::Fit(
                e @ (ClassifierError::SingleClass
                | ClassifierError::EmptyData
                | ClassifierError::NonBinaryLabels(_)),
            ) => RegistryError::DataUnavailable(e.to_string()),
            other => RegistryError::Corrupt(other.to_string()),
        }
    }
}

impl From<ClassifierError> for RegistryError {
    fn from(err: ClassifierError) -> Self {
        RegistryError::from(EntityError::from(err))
    }
}

/// Result type for registry operations
pub type Result<T> = std::result::Result<T, RegistryError>;
