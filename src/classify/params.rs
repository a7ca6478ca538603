//! Hyperparameter maps and typed option readers.

use super::error::{ClassifierError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};

/// Option name → JSON value, as supplied by the caller.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Hyperparameters(BTreeMap<String, Value>);

impl Hyperparameters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the `model_params` text. Absent or blank text means `{}`.
    pub fn parse(text: Option<&str>) -> Result<Self> {
        let text = match text.map(str::trim) {
            None | Some("") => return Ok(Self::new()),
            Some(t) => t,
        };

        let value: Value = serde_json::from_str(text)
            .map_err(|e| ClassifierError::InvalidHyperparameters(format!("malformed JSON: {e}")))?;

        match value {
            Value::Object(map) => Ok(Self(map.into_iter().collect())),
            other => Err(ClassifierError::InvalidHyperparameters(format!(
                "expected a JSON object, got {other}"
            ))),
        }
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Compact JSON object text, as stored in `model_params`.
    pub fn to_json_string(&self) -> String {
        serde_json::to_string(&self.0).unwrap_or_else(|_| "{}".to_string())
    }

    pub(crate) fn reader(&self) -> ParamReader<'_> {
        ParamReader { params: self, consumed: BTreeSet::new() }
    }
}

/// Reads typed options and rejects leftovers on `finish`.
pub(crate) struct ParamReader<'a> {
    params: &'a Hyperparameters,
    consumed: BTreeSet<&'a str>,
}

impl<'a> ParamReader<'a> {
    fn take(&mut self, key: &'a str) -> Option<&'a Value> {
        self.consumed.insert(key);
        self.params.get(key)
    }

    pub fn f64(&mut self, key: &'a str, default: f64) -> Result<f64> {
        match self.take(key) {
            None => Ok(default),
            Some(v) => v.as_f64().ok_or_else(|| wrong_type(key, "a number", v)),
        }
    }

    pub fn positive_f64(&mut self, key: &'a str, default: f64) -> Result<f64> {
        let value = self.f64(key, default)?;
        if value > 0.0 && value.is_finite() {
            Ok(value)
        } else {
            Err(out_of_range(key, "must be > 0", value))
        }
    }

    pub fn i64(&mut self, key: &'a str, default: i64) -> Result<i64> {
        match self.take(key) {
            None => Ok(default),
            Some(v) => v.as_i64().ok_or_else(|| wrong_type(key, "an integer", v)),
        }
    }

    pub fn bool(&mut self, key: &'a str, default: bool) -> Result<bool> {
        match self.take(key) {
            None => Ok(default),
            Some(v) => v.as_bool().ok_or_else(|| wrong_type(key, "a boolean", v)),
        }
    }

    /// Raw value for options that accept several JSON types.
    pub fn value(&mut self, key: &'a str) -> Option<&'a Value> {
        self.take(key)
    }

    /// String option restricted to `allowed`.
    pub fn choice(&mut self, key: &'a str, allowed: &[&str], default: &str) -> Result<String> {
        let value = match self.take(key) {
            None => return Ok(default.to_string()),
            Some(v) => v.as_str().ok_or_else(|| wrong_type(key, "a string", v))?,
        };
        if allowed.contains(&value) {
            Ok(value.to_string())
        } else {
            Err(ClassifierError::InvalidHyperparameters(format!(
                "{key} must be one of {}, got {value:?}",
                allowed.join("|")
            )))
        }
    }

    pub fn finish(self) -> Result<()> {
        let unknown: Vec<&str> = self
            .params
            .0
            .keys()
            .map(String::as_str)
            .filter(|k| !self.consumed.contains(k))
            .collect();
        if unknown.is_empty() {
            Ok(())
        } else {
            Err(ClassifierError::InvalidHyperparameters(format!(
                "unknown option(s): {}",
                unknown.join(", ")
            )))
        }
    }
}

fn wrong_type(key: &str, expected: &str, got: &Value) -> ClassifierError {
    ClassifierError::InvalidHyperparameters(format!("{key} must be {expected}, got {got}"))
}

pub(crate) fn out_of_range(key: &str, rule: &str, got: impl std::fmt::Display) -> ClassifierError {
    ClassifierError::InvalidHyperparameters(format!("{key} {rule}, got {got}"))
}
