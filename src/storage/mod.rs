//! Relational store for model rows, the live dataset and dataset snapshots.
//!
//! # Example
//!
//! ```ignore
//! use heartml::storage::SqliteStore;
//!
//! let store = SqliteStore::open("./heartml.db")?;
//! store.replace_dataset(&dataset)?;
//! let models = store.list_models()?;
//! ```

mod error;
mod sqlite;

pub use error::{Result, StorageError};
pub use sqlite::{ModelRow, ModelSummary, NewModel, SqliteStore, CURRENT_VERSION};
