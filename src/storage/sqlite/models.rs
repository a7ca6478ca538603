//! `models` table operations.

use super::types::{ModelRow, ModelSummary, NewModel};
use super::SqliteStore;
use crate::data::Dataset;
use crate::storage::{Result, StorageError};
use chrono::{DateTime, Utc};
use rusqlite::{params, OptionalExtension};

impl SqliteStore {
    /// Insert a model row, storing its dataset snapshot first if unseen.
    pub fn insert_model(&self, model: &NewModel, snapshot: &Dataset) -> Result<()> {
        let mut conn = self.connect()?;
        let tx = conn
            .transaction()
            .map_err(|e| StorageError::Backend(format!("Failed to begin transaction: {e}")))?;

        Self::put_snapshot_in(&tx, &model.dataset_fingerprint, snapshot)?;

        let now = Utc::now().to_rfc3339();
        tx.execute(
            "INSERT INTO models (model_id, model_name, model_params, model_weights, model_is_trained,
                                 model_version, dataset_fingerprint, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, 0, 1, ?5, ?6, ?6)",
            params![
                model.model_id,
                model.model_name,
                model.model_params,
                model.model_weights,
                model.dataset_fingerprint,
                now
            ],
        )
        .map_err(|e| StorageError::Backend(format!("Failed to insert model: {e}")))?;

        tx.commit()
            .map_err(|e| StorageError::Backend(format!("Failed to commit model: {e}")))
    }

    /// Metadata of every model, oldest first.
    pub fn list_models(&self) -> Result<Vec<(String, ModelSummary)>> {
        let conn = self.connect()?;
        let mut stmt = conn
            .prepare(
                "SELECT model_id, model_name, model_params, model_is_trained
                 FROM models ORDER BY created_at, model_id",
            )
            .map_err(|e| StorageError::Backend(format!("Failed to prepare query: {e}")))?;

        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    ModelSummary {
                        model_name: row.get(1)?,
                        model_params: row.get(2)?,
                        model_is_trained: row.get(3)?,
                    },
                ))
            })
            .map_err(|e| StorageError::Backend(format!("Failed to query models: {e}")))?;

        rows.map(|row| {
            row.map_err(|e| StorageError::Backend(format!("Failed to read model row: {e}")))
        })
        .collect()
    }

    pub fn count_models(&self) -> Result<usize> {
        let conn = self.connect()?;
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM models", [], |row| row.get(0))
            .map_err(|e| StorageError::Backend(format!("Failed to count models: {e}")))?;
        Ok(count as usize)
    }

    pub fn model_exists(&self, model_id: &str) -> Result<bool> {
        let conn = self.connect()?;
        conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM models WHERE model_id = ?1)",
            [model_id],
            |row| row.get(0),
        )
        .map_err(|e| StorageError::Backend(format!("Failed to check model: {e}")))
    }

    /// Delete a model row. Returns whether a row was removed.
    pub fn delete_model(&self, model_id: &str) -> Result<bool> {
        let conn = self.connect()?;
        let removed = conn
            .execute("DELETE FROM models WHERE model_id = ?1", [model_id])
            .map_err(|e| StorageError::Backend(format!("Failed to delete model: {e}")))?;
        Ok(removed > 0)
    }

    pub fn get_model(&self, model_id: &str) -> Result<ModelRow> {
        let conn = self.connect()?;
        let row = conn
            .query_row(
                "SELECT model_id, model_name, model_params, model_weights, model_is_trained,
                        model_version, dataset_fingerprint, created_at, updated_at
                 FROM models WHERE model_id = ?1",
                [model_id],
                |row| {
                    Ok(ModelRow {
                        model_id: row.get(0)?,
                        model_name: row.get(1)?,
                        model_params: row.get(2)?,
                        model_weights: row.get(3)?,
                        model_is_trained: row.get(4)?,
                        model_version: row.get(5)?,
                        dataset_fingerprint: row.get(6)?,
                        created_at: parse_timestamp(&row.get::<_, String>(7)?),
                        updated_at: parse_timestamp(&row.get::<_, String>(8)?),
                    })
                },
            )
            .optional()
            .map_err(|e| StorageError::Backend(format!("Failed to get model: {e}")))?;

        row.ok_or_else(|| StorageError::ModelNotFound(model_id.to_string()))
    }

    /// Write new weights if the row is still at `expected_version`.
    ///
    /// Returns the new version. A row that moved on fails with `Conflict`.
    pub fn update_model(
        &self,
        model_id: &str,
        expected_version: i64,
        model_weights: &[u8],
        model_is_trained: bool,
    ) -> Result<i64> {
        let conn = self.connect()?;
        let updated = conn
            .execute(
                "UPDATE models
                 SET model_weights = ?1, model_is_trained = ?2,
                     model_version = model_version + 1, updated_at = ?3
                 WHERE model_id = ?4 AND model_version = ?5",
                params![
                    model_weights,
                    model_is_trained,
                    Utc::now().to_rfc3339(),
                    model_id,
                    expected_version
                ],
            )
            .map_err(|e| StorageError::Backend(format!("Failed to update model: {e}")))?;

        if updated == 1 {
            return Ok(expected_version + 1);
        }

        let exists: bool = conn
            .query_row(
                "SELECT EXISTS(SELECT 1 FROM models WHERE model_id = ?1)",
                [model_id],
                |row| row.get(0),
            )
            .map_err(|e| StorageError::Backend(format!("Failed to check model: {e}")))?;

        if exists {
            Err(StorageError::Conflict { id: model_id.to_string(), expected_version })
        } else {
            Err(StorageError::ModelNotFound(model_id.to_string()))
        }
    }
}

fn parse_timestamp(text: &str) -> DateTime<Utc> {
    text.parse().unwrap_or_else(|_| Utc::now())
}

#[cfg(test)]
mod tests {
    use super::super::test_support::temp_store;
    use super::*;
    use crate::data::fixtures::heart_dataset;

    fn new_model(id: &str, fingerprint: &str) -> NewModel {
        NewModel {
            model_id: id.to_string(),
            model_name: "logreg".to_string(),
            model_params: "{}".to_string(),
            model_weights: vec![1, 2, 3],
            dataset_fingerprint: fingerprint.to_string(),
        }
    }

    #[test]
    fn test_insert_get_list() {
        let (_dir, store) = temp_store();
        let ds = heart_dataset();
        store
            .insert_model(&new_model("m1", &ds.fingerprint()), &ds)
            .expect("operation should succeed");

        let row = store.get_model("m1").expect("operation should succeed");
        assert_eq!(row.model_name, "logreg");
        assert_eq!(row.model_weights, vec![1, 2, 3]);
        assert!(!row.model_is_trained);
        assert_eq!(row.model_version, 1);

        let listed = store.list_models().expect("operation should succeed");
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].0, "m1");
        assert_eq!(listed[0].1.model_params, "{}");
        assert_eq!(store.count_models().expect("operation should succeed"), 1);
    }

    #[test]
    fn test_get_missing() {
        let (_dir, store) = temp_store();
        assert!(matches!(store.get_model("nope"), Err(StorageError::ModelNotFound(_))));
    }

    #[test]
    fn test_delete() {
        let (_dir, store) = temp_store();
        let ds = heart_dataset();
        store
            .insert_model(&new_model("m1", &ds.fingerprint()), &ds)
            .expect("operation should succeed");

        assert!(store.delete_model("m1").expect("operation should succeed"));
        assert!(!store.delete_model("m1").expect("operation should succeed"));
        assert!(!store.model_exists("m1").expect("operation should succeed"));
    }

    #[test]
    fn test_update_bumps_version() {
        let (_dir, store) = temp_store();
        let ds = heart_dataset();
        store
            .insert_model(&new_model("m1", &ds.fingerprint()), &ds)
            .expect("operation should succeed");

        let version = store.update_model("m1", 1, &[9], true).expect("operation should succeed");
        assert_eq!(version, 2);
        let row = store.get_model("m1").expect("operation should succeed");
        assert!(row.model_is_trained);
        assert_eq!(row.model_weights, vec![9]);
        assert!(row.updated_at >= row.created_at);
    }

    #[test]
    fn test_stale_update_conflicts() {
        let (_dir, store) = temp_store();
        let ds = heart_dataset();
        store
            .insert_model(&new_model("m1", &ds.fingerprint()), &ds)
            .expect("operation should succeed");
        store.update_model("m1", 1, &[9], true).expect("operation should succeed");

        let stale = store.update_model("m1", 1, &[7], true);
        assert!(matches!(stale, Err(StorageError::Conflict { expected_version: 1, .. })));
        assert_eq!(store.get_model("m1").expect("operation should succeed").model_weights, vec![9]);
    }

    #[test]
    fn test_update_missing() {
        let (_dir, store) = temp_store();
        assert!(matches!(
            store.update_model("ghost", 1, &[], true),
            Err(StorageError::ModelNotFound(_))
        ));
    }

    #[test]
    fn test_models_share_snapshot() {
        let (_dir, store) = temp_store();
        let ds = heart_dataset();
        let fp = ds.fingerprint();
        store.insert_model(&new_model("a", &fp), &ds).expect("operation should succeed");
        store.insert_model(&new_model("b", &fp), &ds).expect("operation should succeed");
        assert_eq!(store.count_snapshots().expect("operation should succeed"), 1);
    }
}
