//! Serve command implementation

use super::open_registry;
use crate::cli::logging::log;
use crate::cli::LogLevel;
use crate::config::AppConfig;
use crate::server::ModelServer;

pub fn run_serve(config: AppConfig, level: LogLevel) -> Result<(), String> {
    let registry = open_registry(&config.store)?;
    log(
        level,
        LogLevel::Verbose,
        &format!("Store: {}", registry.store().path().display()),
    );

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| format!("Failed to start runtime: {e}"))?;

    let server = ModelServer::new(config.server, registry, level);
    runtime.block_on(server.run()).map_err(|e| e.to_string())
}
