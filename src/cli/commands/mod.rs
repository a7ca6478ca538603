//! CLI command implementations

mod dataset;
mod init;
mod models;
mod serve;


use crate::cli::LogLevel;
use crate::config::{AppConfig, Cli, Command, Overrides, StoreConfig};
use crate::registry::Registry;
use crate::storage::SqliteStore;
use std::path::PathBuf;

/// Execute a CLI command based on the parsed arguments
pub fn run_command(cli: Cli) -> Result<(), String> {
    let log_level = LogLevel::from_flags(cli.quiet, cli.verbose);

    match cli.command {
        Command::Serve(args) => {
            let overrides = Overrides { db_path: cli.db, address: args.addr };
            let config = AppConfig::from_env(overrides).map_err(|e| e.to_string())?;
            serve::run_serve(config, log_level)
        }
        Command::Models(args) => models::run_models(args, &store_config(cli.db)?, log_level),
        Command::Data(args) => dataset::run_data(args, &store_config(cli.db)?, log_level),
        Command::Init => init::run_init(&store_config(cli.db)?, log_level),
    }
}

/// Store settings alone; the listen address is never read here.
fn store_config(db_path: Option<PathBuf>) -> Result<StoreConfig, String> {
    StoreConfig::from_env(db_path).map_err(|e| e.to_string())
}

fn open_store(config: &StoreConfig) -> Result<SqliteStore, String> {
    SqliteStore::open(&config.path).map_err(|e| format!("Failed to open store: {e}"))
}

fn open_registry(config: &StoreConfig) -> Result<Registry, String> {
    open_store(config).map(Registry::new)
}
