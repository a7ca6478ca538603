//! Fixed preprocessing pipeline: dummy encoding, robust scaling and a
//! deterministic train/test split.
//!
//! # Example
//!
//! ```ignore
//! use heartml::preprocess::{prepare, PipelineConfig};
//!
//! let split = prepare(&dataset, &PipelineConfig::default())?;
//! assert_eq!(split.x_test.nrows(), 61);
//! ```

mod encoding;
mod error;
mod pipeline;
mod scaling;
mod split;

pub use encoding::DummyEncoder;
pub use error::{PreprocessError, Result};
pub use pipeline::{build_features, prepare, FeatureMatrix, PipelineConfig, SplitData};
pub use scaling::RobustScaler;
pub use split::{test_size, train_test_split, SplitIndices, DEFAULT_SEED, DEFAULT_TEST_RATIO};
