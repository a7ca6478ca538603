//! CLI module for heartml
//!
//! Command handlers plus the leveled logger shared with the HTTP server.

mod commands;
pub mod logging;

pub use commands::run_command;
pub use logging::LogLevel;

// Re-export Cli from config for convenience
pub use crate::config::Cli;
