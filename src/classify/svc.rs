//! Kernel support-vector classifier.
//!
//! The dual problem is solved with SMO using maximal-violating-pair
//! working-set selection over a precomputed kernel matrix.

use super::error::{ClassifierError, Result};
use super::params::{out_of_range, Hyperparameters};
use super::Estimator;
use ndarray::{Array2, ArrayView1, ArrayView2};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Iteration ceiling when `max_iter` is -1.
const UNBOUNDED_ITER_CAP: usize = 1_000_000;

/// Curvature floor for non-PSD kernels.
const TAU: f64 = 1e-12;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Kernel {
    Linear,
    Rbf,
    Poly,
    Sigmoid,
}

/// Kernel coefficient for rbf, poly and sigmoid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Gamma {
    /// `1 / (n_features * var(X))`
    Scale,
    /// `1 / n_features`
    Auto,
    Value(f64),
}

impl Gamma {
    fn resolve(&self, x: ArrayView2<f64>) -> f64 {
        let n_features = x.ncols().max(1) as f64;
        match *self {
            Gamma::Scale => {
                let count = x.len().max(1) as f64;
                let mean = x.sum() / count;
                let var = x.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / count;
                if var > 0.0 {
                    1.0 / (n_features * var)
                } else {
                    1.0
                }
            }
            Gamma::Auto => 1.0 / n_features,
            Gamma::Value(g) => g,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SvcConfig {
    pub c: f64,
    pub kernel: Kernel,
    pub gamma: Gamma,
    pub degree: i32,
    pub coef0: f64,
    pub tol: f64,
    /// `None` runs until convergence
    pub max_iter: Option<usize>,
}

impl Default for SvcConfig {
    fn default() -> Self {
        Self {
            c: 1.0,
            kernel: Kernel::Rbf,
            gamma: Gamma::Scale,
            degree: 3,
            coef0: 0.0,
            tol: 1e-3,
            max_iter: None,
        }
    }
}

impl SvcConfig {
    pub fn from_params(params: &Hyperparameters) -> Result<Self> {
        let defaults = Self::default();
        let mut reader = params.reader();

        let c = reader.positive_f64("C", defaults.c)?;
        let kernel = match reader
            .choice("kernel", &["linear", "rbf", "poly", "sigmoid"], "rbf")?
            .as_str()
        {
            "linear" => Kernel::Linear,
            "poly" => Kernel::Poly,
            "sigmoid" => Kernel::Sigmoid,
            _ => Kernel::Rbf,
        };
        let gamma = match reader.value("gamma") {
            None => defaults.gamma,
            Some(Value::String(s)) if s == "scale" => Gamma::Scale,
            Some(Value::String(s)) if s == "auto" => Gamma::Auto,
            Some(v) => match v.as_f64() {
                Some(g) if g > 0.0 && g.is_finite() => Gamma::Value(g),
                _ => return Err(out_of_range("gamma", "must be \"scale\", \"auto\" or > 0", v)),
            },
        };
        let raw_degree = reader.i64("degree", i64::from(defaults.degree))?;
        let degree = i32::try_from(raw_degree)
            .ok()
            .filter(|d| *d >= 1)
            .ok_or_else(|| out_of_range("degree", "must be between 1 and 2147483647", raw_degree))?;
        let coef0 = reader.f64("coef0", defaults.coef0)?;
        let tol = reader.positive_f64("tol", defaults.tol)?;
        let max_iter = match reader.i64("max_iter", -1)? {
            -1 => None,
            n if n >= 1 => Some(n as usize),
            n => return Err(out_of_range("max_iter", "must be -1 or >= 1", n)),
        };
        reader.finish()?;

        Ok(Self { c, kernel, gamma, degree, coef0, tol, max_iter })
    }
}

/// Fitted decision function.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct SupportSet {
    vectors: Vec<Vec<f64>>,
    /// `alpha_t * y_t` per support vector
    dual_coef: Vec<f64>,
    intercept: f64,
    gamma: f64,
    n_iter: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Svc {
    config: SvcConfig,
    fitted: Option<SupportSet>,
}

impl Svc {
    pub fn new(config: SvcConfig) -> Self {
        Self { config, fitted: None }
    }

    pub fn from_params(params: &Hyperparameters) -> Result<Self> {
        Ok(Self::new(SvcConfig::from_params(params)?))
    }

    pub fn config(&self) -> &SvcConfig {
        &self.config
    }

    pub fn n_support(&self) -> usize {
        self.fitted.as_ref().map_or(0, |f| f.vectors.len())
    }

    pub fn intercept(&self) -> Option<f64> {
        self.fitted.as_ref().map(|f| f.intercept)
    }

    pub fn n_iter(&self) -> usize {
        self.fitted.as_ref().map_or(0, |f| f.n_iter)
    }

    /// Signed distance-like score per row; positive means class 1.
    pub fn decision_function(&self, x: ArrayView2<f64>) -> Result<Vec<f64>> {
        let fitted = self.fitted.as_ref().ok_or(ClassifierError::NotFitted)?;
        let width = fitted.vectors.first().map_or(0, Vec::len);
        if x.ncols() != width {
            return Err(ClassifierError::ShapeMismatch {
                expected: format!("{width} features"),
                got: format!("{} features", x.ncols()),
            });
        }

        Ok(x.rows()
            .into_iter()
            .map(|row| {
                let row = row.to_vec();
                fitted
                    .vectors
                    .iter()
                    .zip(&fitted.dual_coef)
                    .map(|(sv, coef)| coef * self.kernel(sv, &row, fitted.gamma))
                    .sum::<f64>()
                    + fitted.intercept
            })
            .collect())
    }

    fn kernel(&self, a: &[f64], b: &[f64], gamma: f64) -> f64 {
        let dot = || a.iter().zip(b).map(|(p, q)| p * q).sum::<f64>();
        match self.config.kernel {
            Kernel::Linear => dot(),
            Kernel::Rbf => {
                let dist: f64 = a.iter().zip(b).map(|(p, q)| (p - q) * (p - q)).sum();
                (-gamma * dist).exp()
            }
            Kernel::Poly => (gamma * dot() + self.config.coef0).powi(self.config.degree),
            Kernel::Sigmoid => (gamma * dot() + self.config.coef0).tanh(),
        }
    }

    fn gram(&self, rows: &[Vec<f64>], gamma: f64) -> Array2<f64> {
        let n = rows.len();
        let mut k = Array2::zeros((n, n));
        for i in 0..n {
            for j in i..n {
                let v = self.kernel(&rows[i], &rows[j], gamma);
                k[[i, j]] = v;
                k[[j, i]] = v;
            }
        }
        k
    }
}

impl Estimator for Svc {
    fn fit(&mut self, x: ArrayView2<f64>, y: ArrayView1<f64>) -> Result<()> {
        super::validate_training_data(x, y)?;

        let gamma = self.config.gamma.resolve(x);
        let rows: Vec<Vec<f64>> = x.rows().into_iter().map(|r| r.to_vec()).collect();
        let k = self.gram(&rows, gamma);
        let signs: Vec<f64> = y.iter().map(|v| if *v > 0.5 { 1.0 } else { -1.0 }).collect();

        let solution = smo(&k, &signs, self.config.c, self.config.tol, self.config.max_iter);

        let mut vectors = Vec::new();
        let mut dual_coef = Vec::new();
        for (t, alpha) in solution.alpha.iter().enumerate() {
            if *alpha > 0.0 {
                vectors.push(rows[t].clone());
                dual_coef.push(alpha * signs[t]);
            }
        }

        self.fitted = Some(SupportSet {
            vectors,
            dual_coef,
            intercept: -solution.rho,
            gamma,
            n_iter: solution.n_iter,
        });
        Ok(())
    }

    fn predict(&self, x: ArrayView2<f64>) -> Result<Vec<i64>> {
        Ok(self.decision_function(x)?.into_iter().map(|d| i64::from(d > 0.0)).collect())
    }

    fn is_fitted(&self) -> bool {
        self.fitted.is_some()
    }
}

struct DualSolution {
    alpha: Vec<f64>,
    rho: f64,
    n_iter: usize,
}

/// Minimize `0.5 a'Qa - e'a` s.t. `0 <= a <= c`, `y'a = 0`, with
/// `Q_ij = y_i y_j K_ij`.
fn smo(k: &Array2<f64>, y: &[f64], c: f64, tol: f64, max_iter: Option<usize>) -> DualSolution {
    let n = y.len();
    let mut alpha = vec![0.0; n];
    let mut grad = vec![-1.0; n];
    let limit = max_iter.unwrap_or(UNBOUNDED_ITER_CAP);

    let in_up = |t: usize, a: f64| (y[t] > 0.0 && a < c) || (y[t] < 0.0 && a > 0.0);
    let in_low = |t: usize, a: f64| (y[t] > 0.0 && a > 0.0) || (y[t] < 0.0 && a < c);

    let mut n_iter = 0;
    while n_iter < limit {
        let mut i = None;
        let mut m = f64::NEG_INFINITY;
        let mut j = None;
        let mut big_m = f64::INFINITY;
        for t in 0..n {
            let score = -y[t] * grad[t];
            if in_up(t, alpha[t]) && score > m {
                m = score;
                i = Some(t);
            }
            if in_low(t, alpha[t]) && score < big_m {
                big_m = score;
                j = Some(t);
            }
        }

        let (i, j) = match (i, j) {
            (Some(i), Some(j)) if m - big_m >= tol => (i, j),
            _ => break,
        };

        let curvature = (k[[i, i]] + k[[j, j]] - 2.0 * k[[i, j]]).max(TAU);
        let bound_i = if y[i] > 0.0 { c - alpha[i] } else { alpha[i] };
        let bound_j = if y[j] > 0.0 { alpha[j] } else { c - alpha[j] };
        let step = ((m - big_m) / curvature).min(bound_i).min(bound_j);

        alpha[i] = snap(alpha[i] + y[i] * step, c);
        alpha[j] = snap(alpha[j] - y[j] * step, c);
        for t in 0..n {
            grad[t] += y[t] * step * (k[[t, i]] - k[[t, j]]);
        }
        n_iter += 1;
    }

    DualSolution { rho: rho(&alpha, &grad, y, c), alpha, n_iter }
}

/// Clamp to `[0, c]`, pinning values within rounding of a bound.
fn snap(a: f64, c: f64) -> f64 {
    if a <= 1e-12 {
        0.0
    } else if a >= c - 1e-12 {
        c
    } else {
        a
    }
}

fn rho(alpha: &[f64], grad: &[f64], y: &[f64], c: f64) -> f64 {
    let mut upper = f64::INFINITY;
    let mut lower = f64::NEG_INFINITY;
    let mut free_sum = 0.0;
    let mut n_free = 0usize;

    for t in 0..alpha.len() {
        let yg = y[t] * grad[t];
        let at_upper = alpha[t] >= c;
        let at_lower = alpha[t] <= 0.0;
        if (at_upper && y[t] < 0.0) || (at_lower && y[t] > 0.0) {
            upper = upper.min(yg);
        } else if at_upper || at_lower {
            lower = lower.max(yg);
        } else {
            n_free += 1;
            free_sum += yg;
        }
    }

    if n_free > 0 {
        free_sum / n_free as f64
    } else {
        (upper + lower) / 2.0
    }
}
