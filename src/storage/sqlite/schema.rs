//! SQLite schema definition and initialization.

use rusqlite::Connection;

/// Current schema version
pub const CURRENT_VERSION: &str = "1.0.0";

/// Initialize the database schema, creating tables if they don't exist.
pub fn init_schema(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(
        "PRAGMA journal_mode = WAL;
         PRAGMA synchronous = NORMAL;
         PRAGMA temp_store = MEMORY;",
    )?;

    conn.execute_batch(SCHEMA_SQL)?;

    let count: i64 = conn.query_row("SELECT COUNT(*) FROM schema_version", [], |row| row.get(0))?;
    if count == 0 {
        conn.execute("INSERT INTO schema_version (version) VALUES (?1)", [CURRENT_VERSION])?;
    }

    Ok(())
}

const SCHEMA_SQL: &str = "
CREATE TABLE IF NOT EXISTS schema_version (
    version TEXT NOT NULL,
    applied_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE TABLE IF NOT EXISTS models (
    model_id TEXT PRIMARY KEY,
    model_name TEXT NOT NULL,
    model_params TEXT NOT NULL DEFAULT '{}',
    model_weights BLOB NOT NULL,
    model_is_trained INTEGER NOT NULL DEFAULT 0,
    model_version INTEGER NOT NULL DEFAULT 1,
    dataset_fingerprint TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL,
    FOREIGN KEY (dataset_fingerprint) REFERENCES dataset_snapshots(fingerprint)
);
CREATE INDEX IF NOT EXISTS idx_models_fingerprint ON models(dataset_fingerprint);

CREATE TABLE IF NOT EXISTS data (
    age REAL NOT NULL,
    sex INTEGER NOT NULL,
    cp INTEGER NOT NULL,
    trtbps REAL NOT NULL,
    chol REAL NOT NULL,
    fbs INTEGER NOT NULL,
    restecg INTEGER NOT NULL,
    thalachh REAL NOT NULL,
    exng INTEGER NOT NULL,
    oldpeak REAL NOT NULL,
    slp INTEGER NOT NULL,
    caa INTEGER NOT NULL,
    thall INTEGER NOT NULL,
    output INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS dataset_snapshots (
    fingerprint TEXT PRIMARY KEY,
    row_count INTEGER NOT NULL,
    records BLOB NOT NULL,
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);
";
