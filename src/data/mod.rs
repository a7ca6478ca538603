//! Heart-attack dataset: fixed schema, CSV import, fingerprinting and
//! data-quality checks.

mod dataset;
mod error;
pub mod quality;
mod schema;

pub use dataset::{Dataset, DatasetSource};
pub use error::{DataError, Result};
pub use quality::{QualityIssue, QualityReport, ReferenceStats};
pub use schema::{
    HeartRecord, CATEGORICAL_COLUMNS, COLUMNS, CONTINUOUS_COLUMNS, LABEL_COLUMN,
};

#[cfg(test)]
pub(crate) mod fixtures {
    use super::Dataset;

    pub(crate) const HEART_CSV: &str = include_str!("../../tests/fixtures/heart.csv");

    /// The synthetic 303-row fixture (161 positive labels).
    pub(crate) fn heart_dataset() -> Dataset {
        Dataset::from_csv_reader(HEART_CSV.as_bytes()).expect("fixture must parse")
    }
}
