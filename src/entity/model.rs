//! A single registered model and its fixed train/test split.

use super::error::{EntityError, Result};
use super::state::PersistedModel;
use crate::classify::{Classifier, Estimator, Hyperparameters, Variant};
use crate::data::{Dataset, DatasetSource};
use crate::preprocess::{prepare, PipelineConfig, SplitData};
use uuid::Uuid;

/// A registered model instance.
#[derive(Debug, Clone)]
pub struct ModelEntity {
    id: Uuid,
    hyperparameters: Hyperparameters,
    is_trained: bool,
    classifier: Classifier,
    dataset: Dataset,
    dataset_fingerprint: String,
    split: SplitData,
}

impl ModelEntity {
    /// Build an untrained entity from a fresh snapshot of `source`.
    ///
    /// Checks run in order: variant name, options, dataset.
    pub fn construct(
        variant: &str,
        hyperparameters: Hyperparameters,
        source: &dyn DatasetSource,
    ) -> Result<Self> {
        let variant: Variant = variant.parse()?;
        let classifier = Classifier::build(variant, &hyperparameters)?;

        let dataset = source
            .load_dataset()
            .map_err(|e| EntityError::DataUnavailable(e.to_string()))?;
        if dataset.is_empty() {
            return Err(EntityError::DataUnavailable("dataset has no rows".to_string()));
        }
        let split = split_of(&dataset)?;

        Ok(Self {
            id: Uuid::new_v4(),
            hyperparameters,
            is_trained: false,
            classifier,
            dataset_fingerprint: dataset.fingerprint(),
            dataset,
            split,
        })
    }

    /// Rebuild an entity from its persisted state and dataset snapshot.
    pub fn restore(state: PersistedModel, dataset: Dataset) -> Result<Self> {
        let fingerprint = dataset.fingerprint();
        if fingerprint != state.dataset_fingerprint {
            return Err(EntityError::Corrupt(format!(
                "snapshot {fingerprint} does not match recorded {}",
                state.dataset_fingerprint
            )));
        }
        if state.classifier.variant() != state.variant {
            return Err(EntityError::Corrupt(format!(
                "variant {} holds a {} classifier",
                state.variant,
                state.classifier.variant()
            )));
        }
        if state.is_trained != state.classifier.is_fitted() {
            return Err(EntityError::Corrupt(format!(
                "is_trained={} disagrees with stored weights",
                state.is_trained
            )));
        }

        let hyperparameters = Hyperparameters::parse(Some(&state.hyperparameters))
            .map_err(|e| EntityError::Corrupt(e.to_string()))?;
        let split = split_of(&dataset).map_err(|e| EntityError::Corrupt(e.to_string()))?;

        Ok(Self {
            id: state.id,
            hyperparameters,
            is_trained: state.is_trained,
            classifier: state.classifier,
            dataset,
            dataset_fingerprint: state.dataset_fingerprint,
            split,
        })
    }

    /// Persisted envelope for this entity.
    pub fn to_state(&self) -> PersistedModel {
        PersistedModel {
            id: self.id,
            variant: self.variant(),
            hyperparameters: self.hyperparameters.to_json_string(),
            is_trained: self.is_trained,
            classifier: self.classifier.clone(),
            dataset_fingerprint: self.dataset_fingerprint.clone(),
        }
    }

    /// Fit on the training side of the split. Re-fitting replaces weights.
    pub fn fit(&mut self) -> Result<String> {
        self.classifier
            .fit(self.split.x_train.view(), self.split.y_train.view())
            .map_err(EntityError::Fit)?;
        self.is_trained = true;
        Ok(format!("Model {} {} fitted", self.variant(), self.id))
    }

    /// Labels for the held-out side of the split.
    pub fn predict(&self) -> Result<Vec<i64>> {
        if !self.is_trained {
            return Err(EntityError::NotTrained(self.id));
        }
        self.classifier
            .predict(self.split.x_test.view())
            .map_err(EntityError::Predict)
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn variant(&self) -> Variant {
        self.classifier.variant()
    }

    pub fn hyperparameters(&self) -> &Hyperparameters {
        &self.hyperparameters
    }

    pub fn is_trained(&self) -> bool {
        self.is_trained
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn dataset_fingerprint(&self) -> &str {
        &self.dataset_fingerprint
    }

    /// Rows in the held-out split.
    pub fn test_size(&self) -> usize {
        self.split.x_test.nrows()
    }

    pub fn split(&self) -> &SplitData {
        &self.split
    }
}

fn split_of(dataset: &Dataset) -> Result<SplitData> {
    prepare(dataset, &PipelineConfig::default())
        .map_err(|e| EntityError::DataUnavailable(e.to_string()))
}
