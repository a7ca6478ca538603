//! Shared handler state

use crate::cli::LogLevel;
use crate::registry::Registry;
use std::sync::Arc;
use std::time::Instant;

/// Immutable state handed to every handler.
#[derive(Debug, Clone)]
pub struct AppState {
    pub registry: Arc<Registry>,
    pub log_level: LogLevel,
    started_at: Instant,
}

impl AppState {
    pub fn new(registry: Registry, log_level: LogLevel) -> Self {
        Self { registry: Arc::new(registry), log_level, started_at: Instant::now() }
    }

    /// Seconds since the state was created
    pub fn uptime_secs(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}
