//! Init command implementation

use super::open_store;
use crate::cli::logging::log;
use crate::cli::LogLevel;
use crate::config::StoreConfig;
use crate::storage::CURRENT_VERSION;

pub fn run_init(config: &StoreConfig, level: LogLevel) -> Result<(), String> {
    let store = open_store(config)?;
    let models = store.count_models().map_err(|e| e.to_string())?;
    let rows = store.load_dataset().map_err(|e| e.to_string())?.len();

    log(
        level,
        LogLevel::Normal,
        &format!(
            "Initialized {} (schema {CURRENT_VERSION})",
            store.path().display()
        ),
    );
    log(level, LogLevel::Verbose, &format!("  Models: {models}"));
    log(level, LogLevel::Verbose, &format!("  Data rows: {rows}"));
    Ok(())
}
