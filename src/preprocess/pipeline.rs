//! Dataset → feature matrix → train/test split.

use super::encoding::DummyEncoder;
use super::error::{PreprocessError, Result};
use super::scaling::RobustScaler;
use super::split::{train_test_split, DEFAULT_SEED, DEFAULT_TEST_RATIO};
use crate::data::{Dataset, CONTINUOUS_COLUMNS};
use ndarray::{s, Array1, Array2, Axis};

/// Split parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PipelineConfig {
    pub test_ratio: f64,
    pub seed: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self { test_ratio: DEFAULT_TEST_RATIO, seed: DEFAULT_SEED }
    }
}

/// Full preprocessed dataset before splitting.
#[derive(Debug, Clone)]
pub struct FeatureMatrix {
    /// Continuous columns first, then dummy indicators
    pub names: Vec<String>,
    pub x: Array2<f64>,
    /// Labels as 0.0 / 1.0
    pub y: Array1<f64>,
}

/// Train and held-out sides of the preprocessed dataset.
#[derive(Debug, Clone)]
pub struct SplitData {
    pub feature_names: Vec<String>,
    pub x_train: Array2<f64>,
    pub y_train: Array1<f64>,
    pub x_test: Array2<f64>,
    pub y_test: Array1<f64>,
}

/// Encode categoricals, then robust-scale the continuous block over the
/// whole dataset.
pub fn build_features(dataset: &Dataset) -> Result<FeatureMatrix> {
    if dataset.is_empty() {
        return Err(PreprocessError::EmptyData("dataset has no rows".to_string()));
    }

    let encoder = DummyEncoder::fit(dataset);
    let n_cont = CONTINUOUS_COLUMNS.len();
    let width = n_cont + encoder.width();

    let mut flat = Vec::with_capacity(dataset.len() * width);
    for record in dataset.records() {
        flat.extend_from_slice(&record.continuous_values());
        encoder.encode_into(record, &mut flat);
    }

    let mut x = Array2::from_shape_vec((dataset.len(), width), flat)
        .map_err(|e| PreprocessError::InvalidParameter(e.to_string()))?;

    let scaler = RobustScaler::fit(x.slice(s![.., ..n_cont]))?;
    scaler.transform_inplace(x.slice_mut(s![.., ..n_cont]))?;

    let y = dataset.records().iter().map(|r| r.label() as f64).collect();

    let mut names: Vec<String> = CONTINUOUS_COLUMNS.iter().map(|c| (*c).to_string()).collect();
    names.extend(encoder.feature_names());

    Ok(FeatureMatrix { names, x, y })
}

/// Build features and split them deterministically.
pub fn prepare(dataset: &Dataset, config: &PipelineConfig) -> Result<SplitData> {
    let features = build_features(dataset)?;
    let indices = train_test_split(dataset.len(), config.test_ratio, config.seed)?;

    Ok(SplitData {
        feature_names: features.names,
        x_train: features.x.select(Axis(0), &indices.train),
        y_train: features.y.select(Axis(0), &indices.train),
        x_test: features.x.select(Axis(0), &indices.test),
        y_test: features.y.select(Axis(0), &indices.test),
    })
}
