//! heartml: model registry and serving API for heart-disease classifiers.
//!
//! Registers classifier instances, persists their state in SQLite, trains
//! them against the shared heart-attack dataset and serves predictions over
//! HTTP.
//!
//! # Lifecycle
//!
//! ```ignore
//! use heartml::registry::Registry;
//! use heartml::storage::SqliteStore;
//!
//! let registry = Registry::new(SqliteStore::open("./heartml.db")?);
//! let added = registry.add_model("logreg", None)?;
//! registry.train_model(&added.model_id)?;
//! let labels = registry.predict_model(&added.model_id)?;
//! ```

pub mod classify;
pub mod cli;
pub mod config;
pub mod data;
pub mod entity;
pub mod preprocess;
pub mod registry;
pub mod server;
pub mod storage;

pub use classify::{Classifier, Estimator, Hyperparameters, Variant};
pub use data::{Dataset, HeartRecord};
pub use entity::ModelEntity;
pub use registry::{Registry, RegistryError};
pub use storage::SqliteStore;
