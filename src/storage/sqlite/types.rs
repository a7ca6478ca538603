//! Row types for the SQLite store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Values for a new `models` row.
#[derive(Debug, Clone, PartialEq)]
pub struct NewModel {
    pub model_id: String,
    pub model_name: String,
    pub model_params: String,
    pub model_weights: Vec<u8>,
    pub dataset_fingerprint: String,
}

/// A full `models` row.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelRow {
    pub model_id: String,
    pub model_name: String,
    pub model_params: String,
    pub model_weights: Vec<u8>,
    pub model_is_trained: bool,
    /// Incremented on every successful update
    pub model_version: i64,
    pub dataset_fingerprint: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Listing metadata; never carries weights.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSummary {
    pub model_name: String,
    pub model_params: String,
    pub model_is_trained: bool,
}
