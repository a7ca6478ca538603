//! Robust Scaler.
//!
//! Scales features using statistics that are robust to outliers:
//!
//! ```text
//! X_scaled = (X - median) / IQR
//! ```
//!
//! Quantiles use linear interpolation between order statistics. A column
//! with zero IQR is only centered.

use super::error::{PreprocessError, Result};
use ndarray::{ArrayView2, ArrayViewMut2, Axis};

/// Per-column center (median) and scale (IQR) learned by [`RobustScaler::fit`].
#[derive(Debug, Clone, PartialEq)]
pub struct RobustScaler {
    center: Vec<f64>,
    scale: Vec<f64>,
}

impl RobustScaler {
    /// Learn medians and interquartile ranges column by column.
    pub fn fit(data: ArrayView2<'_, f64>) -> Result<Self> {
        if data.nrows() == 0 {
            return Err(PreprocessError::EmptyData(
                "cannot fit RobustScaler on empty data".to_string(),
            ));
        }

        let mut center = Vec::with_capacity(data.ncols());
        let mut scale = Vec::with_capacity(data.ncols());

        for column in data.axis_iter(Axis(1)) {
            let mut sorted: Vec<f64> = column.to_vec();
            sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

            let iqr = quantile(&sorted, 0.75) - quantile(&sorted, 0.25);
            center.push(quantile(&sorted, 0.5));
            scale.push(if iqr == 0.0 { 1.0 } else { iqr });
        }

        Ok(Self { center, scale })
    }

    /// Scale `data` in place.
    pub fn transform_inplace(&self, mut data: ArrayViewMut2<'_, f64>) -> Result<()> {
        if data.ncols() != self.center.len() {
            return Err(PreprocessError::FeatureMismatch {
                expected: self.center.len(),
                got: data.ncols(),
            });
        }

        for (mut column, (center, scale)) in
            data.axis_iter_mut(Axis(1)).zip(self.center.iter().zip(&self.scale))
        {
            column.mapv_inplace(|x| (x - center) / scale);
        }
        Ok(())
    }

    /// Median of each column.
    pub fn center(&self) -> &[f64] {
        &self.center
    }

    /// Interquartile range of each column (1.0 where the IQR was zero).
    pub fn scale(&self) -> &[f64] {
        &self.scale
    }
}

/// Linear-interpolated quantile of already sorted data, `q` in [0, 1].
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let n = sorted.len();
    if n == 1 {
        return sorted[0];
    }
    let idx = q * (n - 1) as f64;
    let lower = idx.floor() as usize;
    let upper = (lower + 1).min(n - 1);
    let frac = idx - lower as f64;
    sorted[lower] * (1.0 - frac) + sorted[upper] * frac
}
