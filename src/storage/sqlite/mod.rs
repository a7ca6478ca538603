//! SQLite-backed store.
//!
//! Every operation opens its own connection and drops it before returning;
//! the store value itself only holds the database path.

mod data;
mod models;
mod schema;
mod types;

pub use schema::CURRENT_VERSION;
pub use types::{ModelRow, ModelSummary, NewModel};

use crate::data::{DataError, Dataset, DatasetSource};
use crate::storage::{Result, StorageError};
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use std::time::Duration;

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Handle to a SQLite database file.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    path: PathBuf,
}

impl SqliteStore {
    /// Open (creating if needed) the database and ensure the schema exists.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let store = Self { path: path.as_ref().to_path_buf() };
        store.init()?;
        Ok(store)
    }

    /// Get the database path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create missing tables.
    pub fn init(&self) -> Result<()> {
        let conn = self.connect()?;
        schema::init_schema(&conn)
            .map_err(|e| StorageError::Backend(format!("Failed to initialize schema: {e}")))
    }

    pub(crate) fn connect(&self) -> Result<Connection> {
        let conn = Connection::open(&self.path).map_err(|e| {
            StorageError::Unavailable(format!("{}: {e}", self.path.display()))
        })?;
        conn.busy_timeout(BUSY_TIMEOUT)
            .map_err(|e| StorageError::Unavailable(format!("Failed to configure connection: {e}")))?;
        Ok(conn)
    }
}

impl DatasetSource for SqliteStore {
    fn load_dataset(&self) -> crate::data::Result<Dataset> {
        SqliteStore::load_dataset(self).map_err(|e| DataError::Source(e.to_string()))
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::SqliteStore;
    use tempfile::TempDir;

    /// A fresh store in its own temp directory; keep the dir alive.
    pub(crate) fn temp_store() -> (TempDir, SqliteStore) {
        let dir = TempDir::new().expect("temp dir should be created");
        let store = SqliteStore::open(dir.path().join("heartml.db")).expect("store should open");
        (dir, store)
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::temp_store;
    use super::*;
    use crate::data::fixtures::heart_dataset;

    #[test]
    fn test_open_creates_file() {
        let (dir, store) = temp_store();
        assert!(dir.path().join("heartml.db").exists());
        assert_eq!(store.path(), dir.path().join("heartml.db"));
    }

    #[test]
    fn test_open_missing_directory_is_unavailable() {
        let dir = tempfile::TempDir::new().expect("temp dir should be created");
        let result = SqliteStore::open(dir.path().join("no/such/dir/heartml.db"));
        assert!(matches!(result, Err(StorageError::Unavailable(_))));
    }

    #[test]
    fn test_dataset_source_reads_live_table() {
        let (_dir, store) = temp_store();
        store.replace_dataset(&heart_dataset()).expect("operation should succeed");
        let loaded = DatasetSource::load_dataset(&store).expect("operation should succeed");
        assert_eq!(loaded, heart_dataset());
    }
}
