//! Dummy encoding for the categorical columns.
//!
//! Each categorical column becomes one 0/1 indicator per observed level,
//! except the lowest level which is dropped as the baseline.

use crate::data::{Dataset, HeartRecord, CATEGORICAL_COLUMNS};

/// Levels learned per categorical column, baseline already removed.
#[derive(Debug, Clone, PartialEq)]
pub struct DummyEncoder {
    levels: Vec<Vec<i64>>,
}

impl DummyEncoder {
    /// Learn the sorted distinct levels of every categorical column.
    pub fn fit(dataset: &Dataset) -> Self {
        let mut levels: Vec<Vec<i64>> = vec![Vec::new(); CATEGORICAL_COLUMNS.len()];
        for record in dataset.records() {
            for (col, value) in record.categorical_values().into_iter().enumerate() {
                levels[col].push(value);
            }
        }
        for col in &mut levels {
            col.sort_unstable();
            col.dedup();
            if !col.is_empty() {
                col.remove(0);
            }
        }
        Self { levels }
    }

    /// Number of indicator columns produced.
    pub fn width(&self) -> usize {
        self.levels.iter().map(Vec::len).sum()
    }

    /// Indicator names as `<column>_<level>`.
    pub fn feature_names(&self) -> Vec<String> {
        CATEGORICAL_COLUMNS
            .iter()
            .zip(&self.levels)
            .flat_map(|(name, levels)| levels.iter().map(move |level| format!("{name}_{level}")))
            .collect()
    }

    /// Append the indicators of one record to `out`.
    pub fn encode_into(&self, record: &HeartRecord, out: &mut Vec<f64>) {
        for (value, levels) in record.categorical_values().into_iter().zip(&self.levels) {
            out.extend(levels.iter().map(|level| if *level == value { 1.0 } else { 0.0 }));
        }
    }
}
