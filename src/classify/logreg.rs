//! Logistic regression trained by full-batch gradient descent.

use super::error::{ClassifierError, Result};
use super::params::{out_of_range, Hyperparameters};
use super::Estimator;
use ndarray::{Array1, ArrayView1, ArrayView2};
use serde::{Deserialize, Serialize};

/// Regularization applied to the coefficients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Penalty {
    L2,
    None,
}

/// Logistic regression options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogRegConfig {
    /// Inverse regularization strength
    pub c: f64,
    pub penalty: Penalty,
    pub fit_intercept: bool,
    pub max_iter: usize,
    /// Stop once every gradient component is below this
    pub tol: f64,
    pub learning_rate: f64,
}

impl Default for LogRegConfig {
    fn default() -> Self {
        Self {
            c: 1.0,
            penalty: Penalty::L2,
            fit_intercept: true,
            max_iter: 1000,
            tol: 1e-4,
            learning_rate: 0.5,
        }
    }
}

impl LogRegConfig {
    /// Validate caller options; unknown names are rejected.
    pub fn from_params(params: &Hyperparameters) -> Result<Self> {
        let defaults = Self::default();
        let mut reader = params.reader();

        let c = reader.positive_f64("C", defaults.c)?;
        let penalty = match reader.choice("penalty", &["l2", "none"], "l2")?.as_str() {
            "none" => Penalty::None,
            _ => Penalty::L2,
        };
        let fit_intercept = reader.bool("fit_intercept", defaults.fit_intercept)?;
        let max_iter = reader.i64("max_iter", defaults.max_iter as i64)?;
        if max_iter < 1 {
            return Err(out_of_range("max_iter", "must be >= 1", max_iter));
        }
        let tol = reader.positive_f64("tol", defaults.tol)?;
        let learning_rate = reader.positive_f64("learning_rate", defaults.learning_rate)?;
        reader.finish()?;

        Ok(Self { c, penalty, fit_intercept, max_iter: max_iter as usize, tol, learning_rate })
    }
}

/// Binary logistic regression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticRegression {
    config: LogRegConfig,
    coefficients: Option<Vec<f64>>,
    intercept: f64,
    n_iter: usize,
}

impl LogisticRegression {
    pub fn new(config: LogRegConfig) -> Self {
        Self { config, coefficients: None, intercept: 0.0, n_iter: 0 }
    }

    pub fn from_params(params: &Hyperparameters) -> Result<Self> {
        Ok(Self::new(LogRegConfig::from_params(params)?))
    }

    pub fn config(&self) -> &LogRegConfig {
        &self.config
    }

    pub fn coefficients(&self) -> Option<&[f64]> {
        self.coefficients.as_deref()
    }

    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    /// Gradient steps taken by the last fit.
    pub fn n_iter(&self) -> usize {
        self.n_iter
    }

    /// P(y = 1) per row.
    pub fn predict_proba(&self, x: ArrayView2<f64>) -> Result<Array1<f64>> {
        let w = self.weights(x.ncols())?;
        Ok((x.dot(&w) + self.intercept).mapv(sigmoid))
    }

    fn weights(&self, n_features: usize) -> Result<Array1<f64>> {
        let coef = self.coefficients.as_ref().ok_or(ClassifierError::NotFitted)?;
        if coef.len() != n_features {
            return Err(ClassifierError::ShapeMismatch {
                expected: format!("{} features", coef.len()),
                got: format!("{n_features} features"),
            });
        }
        Ok(Array1::from(coef.clone()))
    }
}

impl Estimator for LogisticRegression {
    fn fit(&mut self, x: ArrayView2<f64>, y: ArrayView1<f64>) -> Result<()> {
        super::validate_training_data(x, y)?;

        let n = x.nrows() as f64;
        let mut w = Array1::<f64>::zeros(x.ncols());
        let mut b = 0.0;
        let lambda = match self.config.penalty {
            Penalty::L2 => 1.0 / (self.config.c * n),
            Penalty::None => 0.0,
        };

        let step = self
            .config
            .learning_rate
            .min(1.0 / lipschitz_bound(x, lambda, self.config.fit_intercept));

        let mut iterations = self.config.max_iter;
        for iter in 0..self.config.max_iter {
            let residual = (x.dot(&w) + b).mapv(sigmoid) - y;
            let grad_w = x.t().dot(&residual) / n + &w * lambda;
            let grad_b = if self.config.fit_intercept { residual.sum() / n } else { 0.0 };

            let max_grad = grad_w.iter().fold(grad_b.abs(), |acc, g| acc.max(g.abs()));
            if max_grad < self.config.tol {
                iterations = iter;
                break;
            }

            w.scaled_add(-step, &grad_w);
            b -= step * grad_b;
        }

        if !b.is_finite() || w.iter().any(|v| !v.is_finite()) {
            return Err(ClassifierError::Diverged(format!(
                "non-finite coefficients after {iterations} iterations"
            )));
        }

        self.coefficients = Some(w.to_vec());
        self.intercept = b;
        self.n_iter = iterations;
        Ok(())
    }

    fn predict(&self, x: ArrayView2<f64>) -> Result<Vec<i64>> {
        let proba = self.predict_proba(x)?;
        Ok(proba.iter().map(|p| i64::from(*p > 0.5)).collect())
    }

    fn is_fitted(&self) -> bool {
        self.coefficients.is_some()
    }
}

/// Upper bound on the gradient's Lipschitz constant: the logistic loss has
/// curvature at most 1/4, so `0.25 * max ||x_i||^2 + lambda` bounds it.
fn lipschitz_bound(x: ArrayView2<f64>, lambda: f64, fit_intercept: bool) -> f64 {
    let bias = if fit_intercept { 1.0 } else { 0.0 };
    let max_norm_sq = x
        .rows()
        .into_iter()
        .map(|row| row.dot(&row) + bias)
        .fold(0.0_f64, f64::max);
    (0.25 * max_norm_sq + lambda).max(f64::MIN_POSITIVE)
}

fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures::heart_dataset;
    use crate::preprocess::{prepare, PipelineConfig};
    use approx::assert_relative_eq;
    use ndarray::array;

    fn separable() -> (ndarray::Array2<f64>, Array1<f64>) {
        let x = array![[-2.0, -1.0], [-1.5, -2.0], [-1.0, -1.5], [1.0, 1.5], [1.5, 2.0], [2.0, 1.0]];
        let y = array![0.0, 0.0, 0.0, 1.0, 1.0, 1.0];
        (x, y)
    }

    #[test]
    fn test_sigmoid_is_stable() {
        assert_relative_eq!(sigmoid(0.0), 0.5);
        assert!(sigmoid(-1000.0) >= 0.0);
        assert!(sigmoid(1000.0) <= 1.0);
        assert_relative_eq!(sigmoid(2.0) + sigmoid(-2.0), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_fit_separable() {
        let (x, y) = separable();
        let mut model = LogisticRegression::new(LogRegConfig::default());
        model.fit(x.view(), y.view()).expect("operation should succeed");

        assert!(model.is_fitted());
        assert_eq!(model.predict(x.view()).expect("operation should succeed"), vec![0, 0, 0, 1, 1, 1]);
        let proba = model.predict_proba(x.view()).expect("operation should succeed");
        assert!(proba.iter().all(|p| (0.0..=1.0).contains(p)));
    }

    #[test]
    fn test_l2_shrinks_coefficients() {
        let (x, y) = separable();
        let mut strong = LogisticRegression::new(LogRegConfig { c: 0.01, ..LogRegConfig::default() });
        let mut weak = LogisticRegression::new(LogRegConfig { c: 100.0, ..LogRegConfig::default() });
        strong.fit(x.view(), y.view()).expect("operation should succeed");
        weak.fit(x.view(), y.view()).expect("operation should succeed");

        let norm = |m: &LogisticRegression| {
            m.coefficients().expect("fitted").iter().map(|w| w * w).sum::<f64>()
        };
        assert!(norm(&strong) < norm(&weak));
    }

    #[test]
    fn test_strong_regularization_converges() {
        let (x, y) = separable();
        for c in [0.01, 0.001] {
            let mut model = LogisticRegression::new(LogRegConfig { c, ..LogRegConfig::default() });
            model.fit(x.view(), y.view()).expect("operation should succeed");
            let coef = model.coefficients().expect("fitted");
            assert!(coef.iter().all(|w| w.is_finite()), "C={c}: {coef:?}");
            assert!(model.n_iter() < model.config().max_iter, "C={c} did not converge");
        }
    }

    #[test]
    fn test_heart_split_across_regularization() {
        let split = prepare(&heart_dataset(), &PipelineConfig::default())
            .expect("operation should succeed");

        let mut previous_norm = f64::INFINITY;
        for c in [1.0, 0.01, 0.001] {
            let mut model = LogisticRegression::new(LogRegConfig { c, ..LogRegConfig::default() });
            model
                .fit(split.x_train.view(), split.y_train.view())
                .expect("operation should succeed");

            let coef = model.coefficients().expect("fitted");
            assert!(coef.iter().all(|w| w.is_finite()) && model.intercept().is_finite());
            let norm = coef.iter().map(|w| w * w).sum::<f64>();
            assert!(norm < previous_norm, "C={c} did not shrink the coefficients");
            previous_norm = norm;

            let held_out = model.predict(split.x_test.view()).expect("operation should succeed");
            assert_eq!(held_out.len(), 61);
            if c >= 0.01 {
                let ones = held_out.iter().filter(|p| **p == 1).count();
                assert!(ones > 0 && ones < 61, "C={c} predicts a single class");
            } else {
                // Near-zero weights leave the intercept in charge; the fit must still settle.
                assert!(model.n_iter() < model.config().max_iter, "C={c} did not converge");
            }
        }
    }

    #[test]
    fn test_non_finite_input_reports_divergence() {
        let x = array![[f64::NAN], [1.0]];
        let y = array![0.0, 1.0];
        let mut model = LogisticRegression::new(LogRegConfig::default());
        assert!(matches!(model.fit(x.view(), y.view()), Err(ClassifierError::Diverged(_))));
        assert!(!model.is_fitted());
    }

    #[test]
    fn test_no_intercept_keeps_zero() {
        let (x, y) = separable();
        let mut model =
            LogisticRegression::new(LogRegConfig { fit_intercept: false, ..LogRegConfig::default() });
        model.fit(x.view(), y.view()).expect("operation should succeed");
        assert_eq!(model.intercept(), 0.0);
    }

    #[test]
    fn test_predict_before_fit() {
        let (x, _) = separable();
        let model = LogisticRegression::new(LogRegConfig::default());
        assert_eq!(model.predict(x.view()), Err(ClassifierError::NotFitted));
    }

    #[test]
    fn test_predict_wrong_width() {
        let (x, y) = separable();
        let mut model = LogisticRegression::new(LogRegConfig::default());
        model.fit(x.view(), y.view()).expect("operation should succeed");
        let narrow = array![[1.0], [2.0]];
        assert!(matches!(model.predict(narrow.view()), Err(ClassifierError::ShapeMismatch { .. })));
    }

    #[test]
    fn test_config_from_params() {
        let params = Hyperparameters::new()
            .with("C", 0.5)
            .with("penalty", "none")
            .with("max_iter", 50)
            .with("learning_rate", 0.1);
        let config = LogRegConfig::from_params(&params).expect("operation should succeed");
        assert_eq!(config.c, 0.5);
        assert_eq!(config.penalty, Penalty::None);
        assert_eq!(config.max_iter, 50);
        assert!(config.fit_intercept);
    }

    #[test]
    fn test_config_rejects_bad_options() {
        let bad = [
            Hyperparameters::new().with("C", 0.0),
            Hyperparameters::new().with("penalty", "l1"),
            Hyperparameters::new().with("max_iter", 0),
            Hyperparameters::new().with("fit_intercept", "yes"),
            Hyperparameters::new().with("kernel", "rbf"),
        ];
        for params in bad {
            assert!(
                matches!(LogRegConfig::from_params(&params), Err(ClassifierError::InvalidHyperparameters(_))),
                "{params:?} should be rejected"
            );
        }
    }
}
