//! Versioned persisted form of a model entity.
//!
//! Layout: 4-byte little-endian format version, then the bincode-encoded
//! [`PersistedModel`]. The dataset snapshot is stored separately and
//! referenced by fingerprint.

use super::error::{EntityError, Result};
use crate::classify::{Classifier, Variant};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Current envelope format.
pub const FORMAT_VERSION: u32 = 1;

/// Minimal reconstructable state of a model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedModel {
    pub id: Uuid,
    pub variant: Variant,
    /// JSON object text
    pub hyperparameters: String,
    pub is_trained: bool,
    pub classifier: Classifier,
    pub dataset_fingerprint: String,
}

impl PersistedModel {
    pub fn encode(&self) -> Result<Vec<u8>> {
        let body = bincode::serialize(self)
            .map_err(|e| EntityError::Corrupt(format!("failed to encode model state: {e}")))?;
        let mut bytes = Vec::with_capacity(4 + body.len());
        bytes.extend_from_slice(&FORMAT_VERSION.to_le_bytes());
        bytes.extend_from_slice(&body);
        Ok(bytes)
    }

    pub fn decode(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < 4 {
            return Err(EntityError::Corrupt(format!(
                "state too short: {} bytes",
                bytes.len()
            )));
        }
        let (header, body) = bytes.split_at(4);
        let version = u32::from_le_bytes([header[0], header[1], header[2], header[3]]);
        if version != FORMAT_VERSION {
            return Err(EntityError::Corrupt(format!(
                "unsupported state format version {version}"
            )));
        }
        bincode::deserialize(body)
            .map_err(|e| EntityError::Corrupt(format!("failed to decode model state: {e}")))
    }
}
