//! Deterministic shuffled train/test split.

use super::error::{PreprocessError, Result};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Seed of the held-out split.
pub const DEFAULT_SEED: u64 = 42;

/// Fraction of rows held out for prediction.
pub const DEFAULT_TEST_RATIO: f64 = 0.2;

/// Row indices of each side of a split.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitIndices {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

/// Held-out size: `ceil(n * test_ratio)`.
pub fn test_size(n: usize, test_ratio: f64) -> usize {
    (n as f64 * test_ratio).ceil() as usize
}

/// Shuffle `0..n` with a seeded RNG; the first `test_size` positions form
/// the test side, the rest the train side.
pub fn train_test_split(n: usize, test_ratio: f64, seed: u64) -> Result<SplitIndices> {
    if !(test_ratio > 0.0 && test_ratio < 1.0) {
        return Err(PreprocessError::InvalidParameter(format!(
            "test_ratio must be in (0, 1), got {test_ratio}"
        )));
    }

    let n_test = test_size(n, test_ratio);
    if n_test == 0 || n_test >= n {
        return Err(PreprocessError::TooFewSamples { samples: n, test_ratio });
    }

    let mut permutation: Vec<usize> = (0..n).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    permutation.shuffle(&mut rng);

    let train = permutation.split_off(n_test);
    Ok(SplitIndices { train, test: permutation })
}
