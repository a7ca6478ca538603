//! In-memory dataset snapshot and its sources.

use super::error::{DataError, Result};
use super::schema::{HeartRecord, COLUMNS};
use csv::{ReaderBuilder, Trim};
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Anything that can hand out a full copy of the shared dataset.
pub trait DatasetSource {
    /// Read the complete dataset.
    fn load_dataset(&self) -> Result<Dataset>;
}

/// Ordered, immutable collection of [`HeartRecord`]s.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    records: Vec<HeartRecord>,
}

impl Dataset {
    pub fn new(records: Vec<HeartRecord>) -> Self {
        Self { records }
    }

    /// Load a dataset from a CSV file with a header row.
    pub fn from_csv_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_csv_reader(BufReader::new(file))
    }

    /// Parse CSV with a header row. Columns must match the fixed schema
    /// exactly (any order) and every label must be 0 or 1.
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = ReaderBuilder::new().trim(Trim::All).from_reader(reader);

        let headers: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();
        check_schema(&headers)?;

        let mut records = Vec::new();
        for (row, result) in rdr.deserialize::<HeartRecord>().enumerate() {
            let record = result?;
            if record.output != 0 && record.output != 1 {
                return Err(DataError::InvalidLabel { row, value: record.output });
            }
            records.push(record);
        }

        Ok(Self::new(records))
    }

    pub fn records(&self) -> &[HeartRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Mean of the label column, `None` when empty.
    pub fn label_mean(&self) -> Option<f64> {
        if self.records.is_empty() {
            return None;
        }
        let sum: i64 = self.records.iter().map(HeartRecord::label).sum();
        Some(sum as f64 / self.records.len() as f64)
    }

    /// Sample standard deviation (ddof = 1) of the label column.
    pub fn label_std(&self) -> Option<f64> {
        let n = self.records.len();
        if n < 2 {
            return None;
        }
        let mean = self.label_mean()?;
        let ss: f64 = self.records.iter().map(|r| (r.label() as f64 - mean).powi(2)).sum();
        Some((ss / (n - 1) as f64).sqrt())
    }

    /// Content hash of the snapshot, stable across process runs.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        for record in &self.records {
            for word in record.canonical_key() {
                hasher.update(word.to_le_bytes());
            }
        }
        format!("sha256-{:x}", hasher.finalize())
    }

    /// Binary encoding used for stored snapshots.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        bincode::serialize(&self.records).map_err(|e| DataError::Serialization(e.to_string()))
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let records: Vec<HeartRecord> =
            bincode::deserialize(bytes).map_err(|e| DataError::Serialization(e.to_string()))?;
        Ok(Self::new(records))
    }
}

impl DatasetSource for Dataset {
    fn load_dataset(&self) -> Result<Dataset> {
        Ok(self.clone())
    }
}

fn check_schema(headers: &[String]) -> Result<()> {
    let missing: Vec<String> = COLUMNS
        .iter()
        .filter(|col| !headers.iter().any(|h| h == *col))
        .map(|col| (*col).to_string())
        .collect();
    let unexpected: Vec<String> =
        headers.iter().filter(|h| !COLUMNS.contains(&h.as_str())).cloned().collect();

    if missing.is_empty() && unexpected.is_empty() {
        Ok(())
    } else {
        Err(DataError::Schema { missing, unexpected })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures::{heart_dataset, HEART_CSV};

    #[test]
    fn test_fixture_has_reference_row_count() {
        let ds = heart_dataset();
        assert_eq!(ds.len(), 303);
        assert!(!ds.is_empty());
    }

    #[test]
    fn test_columns_in_any_order_are_accepted() {
        let csv = "output,age,sex,cp,trtbps,chol,fbs,restecg,thalachh,exng,oldpeak,slp,caa,thall\n\
                   1,63,1,3,145,233,1,0,150,0,2.3,0,0,1\n";
        let ds = Dataset::from_csv_reader(csv.as_bytes()).expect("operation should succeed");
        assert_eq!(ds.len(), 1);
        assert_eq!(ds.records()[0].age, 63.0);
        assert_eq!(ds.records()[0].output, 1);
    }

    #[test]
    fn test_missing_column_is_schema_error() {
        let csv = "age,sex,cp,trtbps,chol,fbs,restecg,thalachh,exng,oldpeak,slp,caa,output\n\
                   63,1,3,145,233,1,0,150,0,2.3,0,0,1\n";
        match Dataset::from_csv_reader(csv.as_bytes()) {
            Err(DataError::Schema { missing, unexpected }) => {
                assert_eq!(missing, vec!["thall".to_string()]);
                assert!(unexpected.is_empty());
            }
            other => panic!("expected schema error, got {other:?}"),
        }
    }

    #[test]
    fn test_extra_column_is_schema_error() {
        let csv = "age,sex,cp,trtbps,chol,fbs,restecg,thalachh,exng,oldpeak,slp,caa,thall,output,id\n\
                   63,1,3,145,233,1,0,150,0,2.3,0,0,1,1,7\n";
        match Dataset::from_csv_reader(csv.as_bytes()) {
            Err(DataError::Schema { unexpected, .. }) => {
                assert_eq!(unexpected, vec!["id".to_string()]);
            }
            other => panic!("expected schema error, got {other:?}"),
        }
    }

    #[test]
    fn test_non_binary_label_rejected() {
        let csv = "age,sex,cp,trtbps,chol,fbs,restecg,thalachh,exng,oldpeak,slp,caa,thall,output\n\
                   63,1,3,145,233,1,0,150,0,2.3,0,0,1,2\n";
        assert!(matches!(
            Dataset::from_csv_reader(csv.as_bytes()),
            Err(DataError::InvalidLabel { row: 0, value: 2 })
        ));
    }

    #[test]
    fn test_fingerprint_is_stable_and_content_sensitive() {
        let a = heart_dataset();
        let b = Dataset::from_csv_reader(HEART_CSV.as_bytes()).expect("operation should succeed");
        assert_eq!(a.fingerprint(), b.fingerprint());
        assert!(a.fingerprint().starts_with("sha256-"));

        let mut records = a.records().to_vec();
        records[0].chol += 1.0;
        assert_ne!(Dataset::new(records).fingerprint(), a.fingerprint());
    }

    #[test]
    fn test_snapshot_bytes_preserve_records() {
        let ds = heart_dataset();
        let bytes = ds.to_bytes().expect("operation should succeed");
        let back = Dataset::from_bytes(&bytes).expect("operation should succeed");
        assert_eq!(back, ds);
        assert_eq!(back.fingerprint(), ds.fingerprint());
    }

    #[test]
    fn test_label_statistics() {
        let ds = Dataset::new(Vec::new());
        assert!(ds.label_mean().is_none());
        assert!(ds.label_std().is_none());

        let ds = heart_dataset();
        let mean = ds.label_mean().expect("non-empty");
        assert!(mean > 0.0 && mean < 1.0);
        assert!(ds.label_std().expect("non-empty") > 0.4);
    }
}
