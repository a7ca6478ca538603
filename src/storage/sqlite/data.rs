//! Live `data` table and immutable dataset snapshots.

use super::SqliteStore;
use crate::data::{Dataset, HeartRecord, COLUMNS};
use crate::storage::{Result, StorageError};
use rusqlite::{params, Connection, OptionalExtension};

impl SqliteStore {
    /// Replace the live dataset in one transaction.
    pub fn replace_dataset(&self, dataset: &Dataset) -> Result<usize> {
        let mut conn = self.connect()?;
        let tx = conn
            .transaction()
            .map_err(|e| StorageError::Backend(format!("Failed to begin transaction: {e}")))?;

        tx.execute("DELETE FROM data", [])
            .map_err(|e| StorageError::Backend(format!("Failed to clear data: {e}")))?;

        {
            let mut stmt = tx
                .prepare(&format!(
                    "INSERT INTO data ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
                    COLUMNS.join(", ")
                ))
                .map_err(|e| StorageError::Backend(format!("Failed to prepare insert: {e}")))?;

            for r in dataset.records() {
                stmt.execute(params![
                    r.age, r.sex, r.cp, r.trtbps, r.chol, r.fbs, r.restecg, r.thalachh, r.exng,
                    r.oldpeak, r.slp, r.caa, r.thall, r.output
                ])
                .map_err(|e| StorageError::Backend(format!("Failed to insert data row: {e}")))?;
            }
        }

        tx.commit()
            .map_err(|e| StorageError::Backend(format!("Failed to commit data: {e}")))?;
        Ok(dataset.len())
    }

    /// Full read of the live dataset, in insertion order.
    pub fn load_dataset(&self) -> Result<Dataset> {
        let conn = self.connect()?;
        let mut stmt = conn
            .prepare(&format!("SELECT {} FROM data ORDER BY rowid", COLUMNS.join(", ")))
            .map_err(|e| StorageError::Backend(format!("Failed to prepare query: {e}")))?;

        let rows = stmt
            .query_map([], |row| {
                Ok(HeartRecord {
                    age: row.get(0)?,
                    sex: row.get(1)?,
                    cp: row.get(2)?,
                    trtbps: row.get(3)?,
                    chol: row.get(4)?,
                    fbs: row.get(5)?,
                    restecg: row.get(6)?,
                    thalachh: row.get(7)?,
                    exng: row.get(8)?,
                    oldpeak: row.get(9)?,
                    slp: row.get(10)?,
                    caa: row.get(11)?,
                    thall: row.get(12)?,
                    output: row.get(13)?,
                })
            })
            .map_err(|e| StorageError::Backend(format!("Failed to query data: {e}")))?;

        let records = rows
            .map(|row| row.map_err(|e| StorageError::Backend(format!("Failed to read data row: {e}"))))
            .collect::<Result<Vec<_>>>()?;
        Ok(Dataset::new(records))
    }

    /// Column names of the live `data` table.
    pub fn data_columns(&self) -> Result<Vec<String>> {
        let conn = self.connect()?;
        let mut stmt = conn
            .prepare("SELECT name FROM pragma_table_info('data') ORDER BY cid")
            .map_err(|e| StorageError::Backend(format!("Failed to prepare query: {e}")))?;
        let names = stmt
            .query_map([], |row| row.get::<_, String>(0))
            .map_err(|e| StorageError::Backend(format!("Failed to read columns: {e}")))?;
        names
            .map(|n| n.map_err(|e| StorageError::Backend(format!("Failed to read column: {e}"))))
            .collect()
    }

    /// Snapshot stored under `fingerprint`.
    pub fn get_snapshot(&self, fingerprint: &str) -> Result<Dataset> {
        let conn = self.connect()?;
        let bytes: Option<Vec<u8>> = conn
            .query_row(
                "SELECT records FROM dataset_snapshots WHERE fingerprint = ?1",
                [fingerprint],
                |row| row.get(0),
            )
            .optional()
            .map_err(|e| StorageError::Backend(format!("Failed to get snapshot: {e}")))?;

        let bytes = bytes.ok_or_else(|| StorageError::SnapshotNotFound(fingerprint.to_string()))?;
        Dataset::from_bytes(&bytes).map_err(|e| StorageError::Serialization(e.to_string()))
    }

    pub fn count_snapshots(&self) -> Result<usize> {
        let conn = self.connect()?;
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM dataset_snapshots", [], |row| row.get(0))
            .map_err(|e| StorageError::Backend(format!("Failed to count snapshots: {e}")))?;
        Ok(count as usize)
    }

    /// Drop snapshots no model refers to. Returns how many were removed.
    pub fn prune_snapshots(&self) -> Result<usize> {
        let conn = self.connect()?;
        conn.execute(
            "DELETE FROM dataset_snapshots
             WHERE fingerprint NOT IN (SELECT dataset_fingerprint FROM models)",
            [],
        )
        .map_err(|e| StorageError::Backend(format!("Failed to prune snapshots: {e}")))
    }

    pub(super) fn put_snapshot_in(
        conn: &Connection,
        fingerprint: &str,
        dataset: &Dataset,
    ) -> Result<()> {
        let bytes = dataset.to_bytes().map_err(|e| StorageError::Serialization(e.to_string()))?;
        conn.execute(
            "INSERT OR IGNORE INTO dataset_snapshots (fingerprint, row_count, records) VALUES (?1, ?2, ?3)",
            params![fingerprint, dataset.len() as i64, bytes],
        )
        .map_err(|e| StorageError::Backend(format!("Failed to store snapshot: {e}")))?;
        Ok(())
    }
}
