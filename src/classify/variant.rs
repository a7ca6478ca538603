//! Closed set of algorithm variants.

use super::error::ClassifierError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Algorithm backing a model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    /// Logistic regression
    LogReg,
    /// Kernel support-vector classifier
    Svc,
}

impl Variant {
    pub const ALL: [Variant; 2] = [Variant::LogReg, Variant::Svc];

    /// Wire name, as accepted by `model_name`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Variant::LogReg => "logreg",
            Variant::Svc => "svc",
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Variant {
    type Err = ClassifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "logreg" => Ok(Variant::LogReg),
            "svc" => Ok(Variant::Svc),
            other => Err(ClassifierError::InvalidVariant(other.to_string())),
        }
    }
}
