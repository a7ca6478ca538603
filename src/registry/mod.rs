//! Model registry: add, list, delete, train and predict over the store.
//!
//! Each call loads what it needs from the store, works on it and writes
//! back; nothing is cached between calls.
//!
//! # Example
//!
//! ```ignore
//! use heartml::{Registry, SqliteStore};
//!
//! let registry = Registry::new(SqliteStore::open("./heartml.db")?);
//! let added = registry.add_model("logreg", Some(r#"{"C": 0.5}"#))?;
//! registry.train_model(&added.model_id)?;
//! let labels = registry.predict_model(&added.model_id)?;
//! ```

mod error;

pub use error::{RegistryError, Result};

use crate::classify::{Hyperparameters, Variant};
use crate::entity::{ModelEntity, PersistedModel};
use crate::storage::{ModelRow, ModelSummary, NewModel, SqliteStore};
use std::collections::BTreeMap;

/// Result of a successful add.
#[derive(Debug, Clone, PartialEq)]
pub struct AddOutcome {
    pub model_id: String,
    pub message: String,
}

/// Result of a successful train.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainOutcome {
    pub message: String,
    /// `Model <variant> <id> fitted`
    pub fit_message: String,
    pub model_version: i64,
}

/// Registry over a SQLite store.
#[derive(Debug, Clone)]
pub struct Registry {
    store: SqliteStore,
}

impl Registry {
    pub fn new(store: SqliteStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &SqliteStore {
        &self.store
    }

    /// Construct a model from the current dataset and store it untrained.
    ///
    /// `model_params` is JSON object text; absent or blank means `{}`.
    pub fn add_model(&self, model_name: &str, model_params: Option<&str>) -> Result<AddOutcome> {
        model_name.parse::<Variant>()?;
        let params = Hyperparameters::parse(model_params)?;

        let entity = ModelEntity::construct(model_name, params, &self.store)?;
        let weights = entity.to_state().encode()?;
        let model_id = entity.id().to_string();

        self.store.insert_model(
            &NewModel {
                model_id: model_id.clone(),
                model_name: entity.variant().to_string(),
                model_params: entity.hyperparameters().to_json_string(),
                model_weights: weights,
                dataset_fingerprint: entity.dataset_fingerprint().to_string(),
            },
            entity.dataset(),
        )?;

        Ok(AddOutcome {
            message: format!("Model {model_name} added, id: {model_id}"),
            model_id,
        })
    }

    /// Metadata of every stored model, keyed by id.
    pub fn list_models(&self) -> Result<BTreeMap<String, ModelSummary>> {
        Ok(self.store.list_models()?.into_iter().collect())
    }

    pub fn count_models(&self) -> Result<usize> {
        Ok(self.store.count_models()?)
    }

    /// Remove a model. Unknown ids fail with `NotFound` and change nothing.
    pub fn delete_model(&self, model_id: &str) -> Result<String> {
        if !self.store.delete_model(model_id)? {
            return Err(RegistryError::NotFound(model_id.to_string()));
        }
        self.store.prune_snapshots()?;
        Ok(format!("Model {model_id} deleted"))
    }

    /// Fit a stored model on its training split and write it back.
    pub fn train_model(&self, model_id: &str) -> Result<TrainOutcome> {
        let row = self.store.get_model(model_id)?;
        let mut entity = self.restore(&row)?;

        let fit_message = entity.fit()?;
        let weights = entity.to_state().encode()?;
        let model_version = self.store.update_model(model_id, row.model_version, &weights, true)?;

        Ok(TrainOutcome { message: format!("Model {model_id} trained"), fit_message, model_version })
    }

    /// Labels for the model's held-out split.
    pub fn predict_model(&self, model_id: &str) -> Result<Vec<i64>> {
        let row = self.store.get_model(model_id)?;
        Ok(self.restore(&row)?.predict()?)
    }

    fn restore(&self, row: &ModelRow) -> Result<ModelEntity> {
        let state = PersistedModel::decode(&row.model_weights)?;
        if state.id.to_string() != row.model_id {
            return Err(RegistryError::Corrupt(format!(
                "row {} holds state for model {}",
                row.model_id, state.id
            )));
        }
        let snapshot = self.store.get_snapshot(&state.dataset_fingerprint)?;
        Ok(ModelEntity::restore(state, snapshot)?)
    }
}
