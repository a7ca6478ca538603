//! Data-quality checks for the shared dataset.
//!
//! These guard the input, not the model: duplicate rows, the exact column
//! set, and a drift bound on the label mean.

use super::dataset::Dataset;
use super::error::Result;
use super::schema::COLUMNS;
use csv::{ReaderBuilder, Trim};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::io::Read;

/// Label statistics of the reference (historical) dataset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ReferenceStats {
    pub mean: f64,
    pub std: f64,
    /// Allowed deviation in standard deviations
    pub sigmas: f64,
}

impl Default for ReferenceStats {
    fn default() -> Self {
        Self { mean: 0.544_554_455_445_544_6, std: 0.498_834_784_164_392_6, sigmas: 3.0 }
    }
}

impl ReferenceStats {
    /// Open interval the label mean must fall into.
    pub fn bounds(&self) -> (f64, f64) {
        (self.mean - self.sigmas * self.std, self.mean + self.sigmas * self.std)
    }
}

/// A single failed check.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "check", rename_all = "snake_case")]
pub enum QualityIssue {
    /// Zero-based row indices; `duplicate` repeats `first`.
    DuplicateRow { first: usize, duplicate: usize },
    MissingColumns { columns: Vec<String> },
    UnexpectedColumns { columns: Vec<String> },
    TargetDeviation { mean: f64, lower: f64, upper: f64 },
    Empty,
}

impl fmt::Display for QualityIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QualityIssue::DuplicateRow { first, duplicate } => {
                write!(f, "row {duplicate} duplicates row {first}")
            }
            QualityIssue::MissingColumns { columns } => {
                write!(f, "missing columns: {}", columns.join(", "))
            }
            QualityIssue::UnexpectedColumns { columns } => {
                write!(f, "unexpected columns: {}", columns.join(", "))
            }
            QualityIssue::TargetDeviation { mean, lower, upper } => {
                write!(f, "label mean {mean:.4} outside ({lower:.4}, {upper:.4})")
            }
            QualityIssue::Empty => write!(f, "dataset has no rows"),
        }
    }
}

/// Outcome of all checks over one dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QualityReport {
    pub rows: usize,
    pub label_mean: Option<f64>,
    pub issues: Vec<QualityIssue>,
}

impl QualityReport {
    pub fn passed(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn duplicate_count(&self) -> usize {
        self.issues.iter().filter(|i| matches!(i, QualityIssue::DuplicateRow { .. })).count()
    }
}

/// Pairs of (first occurrence, later duplicate) row indices.
pub fn find_duplicates(dataset: &Dataset) -> Vec<(usize, usize)> {
    let mut seen: HashMap<[u64; 14], usize> = HashMap::with_capacity(dataset.len());
    let mut duplicates = Vec::new();
    for (idx, record) in dataset.records().iter().enumerate() {
        match seen.get(&record.canonical_key()) {
            Some(&first) => duplicates.push((first, idx)),
            None => {
                seen.insert(record.canonical_key(), idx);
            }
        }
    }
    duplicates
}

/// Compare a column list against the fixed schema.
pub fn check_columns<S: AsRef<str>>(columns: &[S]) -> Vec<QualityIssue> {
    let names: Vec<&str> = columns.iter().map(|c| c.as_ref()).collect();
    let mut issues = Vec::new();

    let missing: Vec<String> = COLUMNS
        .iter()
        .filter(|col| !names.contains(col))
        .map(|col| (*col).to_string())
        .collect();
    if !missing.is_empty() {
        issues.push(QualityIssue::MissingColumns { columns: missing });
    }

    let unexpected: Vec<String> =
        names.iter().filter(|c| !COLUMNS.contains(c)).map(|c| (*c).to_string()).collect();
    if !unexpected.is_empty() {
        issues.push(QualityIssue::UnexpectedColumns { columns: unexpected });
    }

    issues
}

/// Label mean must lie strictly inside the reference bounds.
pub fn check_target(dataset: &Dataset, reference: &ReferenceStats) -> Option<QualityIssue> {
    let mean = dataset.label_mean()?;
    let (lower, upper) = reference.bounds();
    if mean > lower && mean < upper {
        None
    } else {
        Some(QualityIssue::TargetDeviation { mean, lower, upper })
    }
}

/// Run every check over an already parsed dataset.
pub fn check_dataset<S: AsRef<str>>(
    dataset: &Dataset,
    columns: &[S],
    reference: &ReferenceStats,
) -> QualityReport {
    let mut issues = check_columns(columns);

    if dataset.is_empty() {
        issues.push(QualityIssue::Empty);
    }
    issues.extend(
        find_duplicates(dataset)
            .into_iter()
            .map(|(first, duplicate)| QualityIssue::DuplicateRow { first, duplicate }),
    );
    issues.extend(check_target(dataset, reference));

    QualityReport { rows: dataset.len(), label_mean: dataset.label_mean(), issues }
}

/// Check raw CSV. Column problems are reported instead of failing the parse.
pub fn inspect_csv<R: Read>(mut reader: R, reference: &ReferenceStats) -> Result<QualityReport> {
    let mut buf = Vec::new();
    reader.read_to_end(&mut buf)?;

    let mut rdr = ReaderBuilder::new().trim(Trim::All).from_reader(buf.as_slice());
    let columns: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();

    let column_issues = check_columns(&columns);
    if !column_issues.is_empty() {
        let rows = rdr.records().count();
        return Ok(QualityReport { rows, label_mean: None, issues: column_issues });
    }

    let dataset = Dataset::from_csv_reader(buf.as_slice())?;
    Ok(check_dataset(&dataset, &columns, reference))
}
