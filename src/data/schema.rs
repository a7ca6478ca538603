//! Fixed 14-column schema of the heart-attack dataset.

use serde::{Deserialize, Serialize};

/// All columns, in storage order.
pub const COLUMNS: [&str; 14] = [
    "age", "sex", "cp", "trtbps", "chol", "fbs", "restecg", "thalachh", "exng", "oldpeak", "slp",
    "caa", "thall", "output",
];

/// Columns expanded into dummy indicators, in encoding order.
pub const CATEGORICAL_COLUMNS: [&str; 8] =
    ["sex", "exng", "caa", "cp", "fbs", "restecg", "slp", "thall"];

/// Columns robust-scaled before fitting.
pub const CONTINUOUS_COLUMNS: [&str; 5] = ["age", "trtbps", "chol", "thalachh", "oldpeak"];

/// Binary target column.
pub const LABEL_COLUMN: &str = "output";

/// One patient row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeartRecord {
    pub age: f64,
    pub sex: i64,
    pub cp: i64,
    pub trtbps: f64,
    pub chol: f64,
    pub fbs: i64,
    pub restecg: i64,
    pub thalachh: f64,
    pub exng: i64,
    pub oldpeak: f64,
    pub slp: i64,
    pub caa: i64,
    pub thall: i64,
    pub output: i64,
}

impl HeartRecord {
    /// Continuous values in [`CONTINUOUS_COLUMNS`] order.
    pub fn continuous_values(&self) -> [f64; 5] {
        [self.age, self.trtbps, self.chol, self.thalachh, self.oldpeak]
    }

    /// Categorical values in [`CATEGORICAL_COLUMNS`] order.
    pub fn categorical_values(&self) -> [i64; 8] {
        [self.sex, self.exng, self.caa, self.cp, self.fbs, self.restecg, self.slp, self.thall]
    }

    pub fn label(&self) -> i64 {
        self.output
    }

    /// Bit-exact identity of the row, used for duplicate detection and hashing.
    pub(crate) fn canonical_key(&self) -> [u64; 14] {
        [
            self.age.to_bits(),
            self.sex as u64,
            self.cp as u64,
            self.trtbps.to_bits(),
            self.chol.to_bits(),
            self.fbs as u64,
            self.restecg as u64,
            self.thalachh.to_bits(),
            self.exng as u64,
            self.oldpeak.to_bits(),
            self.slp as u64,
            self.caa as u64,
            self.thall as u64,
            self.output as u64,
        ]
    }
}
