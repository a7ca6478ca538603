//! Binary classifiers behind a common estimator contract.

mod error;
mod logreg;
mod params;
mod svc;
mod variant;

pub use error::{ClassifierError, Result};
pub use logreg::{LogRegConfig, LogisticRegression, Penalty};
pub use params::Hyperparameters;
pub use svc::{Gamma, Kernel, Svc, SvcConfig};
pub use variant::Variant;

use ndarray::{ArrayView1, ArrayView2};
use serde::{Deserialize, Serialize};

/// Fit/predict contract shared by every variant.
pub trait Estimator {
    /// Fit on features `x` (rows = samples) and labels `y` in {0, 1}.
    fn fit(&mut self, x: ArrayView2<f64>, y: ArrayView1<f64>) -> Result<()>;

    /// Predicted labels, one per row of `x`.
    fn predict(&self, x: ArrayView2<f64>) -> Result<Vec<i64>>;

    fn is_fitted(&self) -> bool;
}

/// A classifier of one of the supported variants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Classifier {
    LogReg(LogisticRegression),
    Svc(Svc),
}

impl Classifier {
    /// Construct an unfitted classifier, validating its options.
    pub fn build(variant: Variant, params: &Hyperparameters) -> Result<Self> {
        match variant {
            Variant::LogReg => Ok(Classifier::LogReg(LogisticRegression::from_params(params)?)),
            Variant::Svc => Ok(Classifier::Svc(Svc::from_params(params)?)),
        }
    }

    pub fn variant(&self) -> Variant {
        match self {
            Classifier::LogReg(_) => Variant::LogReg,
            Classifier::Svc(_) => Variant::Svc,
        }
    }

    fn as_estimator(&self) -> &dyn Estimator {
        match self {
            Classifier::LogReg(m) => m,
            Classifier::Svc(m) => m,
        }
    }

    fn as_estimator_mut(&mut self) -> &mut dyn Estimator {
        match self {
            Classifier::LogReg(m) => m,
            Classifier::Svc(m) => m,
        }
    }
}

impl Estimator for Classifier {
    fn fit(&mut self, x: ArrayView2<f64>, y: ArrayView1<f64>) -> Result<()> {
        self.as_estimator_mut().fit(x, y)
    }

    fn predict(&self, x: ArrayView2<f64>) -> Result<Vec<i64>> {
        self.as_estimator().predict(x)
    }

    fn is_fitted(&self) -> bool {
        self.as_estimator().is_fitted()
    }
}

/// Shape, emptiness and label checks shared by every `fit`.
pub(crate) fn validate_training_data(x: ArrayView2<f64>, y: ArrayView1<f64>) -> Result<()> {
    if x.nrows() == 0 || x.ncols() == 0 {
        return Err(ClassifierError::EmptyData);
    }
    if x.nrows() != y.len() {
        return Err(ClassifierError::ShapeMismatch {
            expected: format!("{} labels", x.nrows()),
            got: format!("{} labels", y.len()),
        });
    }
    if let Some(bad) = y.iter().find(|v| **v != 0.0 && **v != 1.0) {
        return Err(ClassifierError::NonBinaryLabels(*bad));
    }
    let positives = y.iter().filter(|v| **v == 1.0).count();
    if positives == 0 || positives == y.len() {
        return Err(ClassifierError::SingleClass);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures::heart_dataset;
    use crate::preprocess::{prepare, PipelineConfig};
    use ndarray::array;

    fn accuracy(predicted: &[i64], truth: ArrayView1<f64>) -> f64 {
        let hits = predicted.iter().zip(truth).filter(|(p, t)| **p as f64 == **t).count();
        hits as f64 / truth.len() as f64
    }

    #[test]
    fn test_build_each_variant() {
        for variant in Variant::ALL {
            let model = Classifier::build(variant, &Hyperparameters::new())
                .expect("operation should succeed");
            assert_eq!(model.variant(), variant);
            assert!(!model.is_fitted());
        }
    }

    #[test]
    fn test_build_rejects_foreign_options() {
        let svc_only = Hyperparameters::new().with("kernel", "linear");
        assert!(matches!(
            Classifier::build(Variant::LogReg, &svc_only),
            Err(ClassifierError::InvalidHyperparameters(_))
        ));
        assert!(Classifier::build(Variant::Svc, &svc_only).is_ok());
    }

    #[test]
    fn test_validate_training_data() {
        let x = array![[1.0], [2.0], [3.0]];
        assert!(validate_training_data(x.view(), array![0.0, 1.0, 0.0].view()).is_ok());
        assert_eq!(
            validate_training_data(x.view(), array![0.0, 2.0, 1.0].view()),
            Err(ClassifierError::NonBinaryLabels(2.0))
        );
        assert_eq!(
            validate_training_data(x.view(), array![1.0, 1.0, 1.0].view()),
            Err(ClassifierError::SingleClass)
        );
        assert!(matches!(
            validate_training_data(x.view(), array![0.0, 1.0].view()),
            Err(ClassifierError::ShapeMismatch { .. })
        ));
        let empty = ndarray::Array2::<f64>::zeros((0, 3));
        assert_eq!(
            validate_training_data(empty.view(), ndarray::Array1::zeros(0).view()),
            Err(ClassifierError::EmptyData)
        );
    }

    #[test]
    fn test_heart_split_accuracy() {
        let split = prepare(&heart_dataset(), &PipelineConfig::default())
            .expect("operation should succeed");

        for variant in Variant::ALL {
            let mut model = Classifier::build(variant, &Hyperparameters::new())
                .expect("operation should succeed");
            model
                .fit(split.x_train.view(), split.y_train.view())
                .expect("operation should succeed");

            let held_out = model.predict(split.x_test.view()).expect("operation should succeed");
            assert_eq!(held_out.len(), 61);
            assert!(held_out.iter().all(|p| *p == 0 || *p == 1));
            assert!(
                accuracy(&held_out, split.y_test.view()) > 0.6,
                "{variant} held-out accuracy too low"
            );

            let train = model.predict(split.x_train.view()).expect("operation should succeed");
            assert!(accuracy(&train, split.y_train.view()) > 0.7, "{variant} train accuracy too low");
        }
    }

    #[test]
    fn test_fit_is_deterministic() {
        let split = prepare(&heart_dataset(), &PipelineConfig::default())
            .expect("operation should succeed");
        let params = Hyperparameters::new();
        let mut a = Classifier::build(Variant::Svc, &params).expect("operation should succeed");
        let mut b = Classifier::build(Variant::Svc, &params).expect("operation should succeed");
        a.fit(split.x_train.view(), split.y_train.view()).expect("operation should succeed");
        b.fit(split.x_train.view(), split.y_train.view()).expect("operation should succeed");
        assert_eq!(a, b);
    }
}
