//! Leveled output for the CLI and the server

use std::fmt::Write as _;

/// Log level for CLI output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    /// Suppress all output
    Quiet,
    /// Normal output level
    #[default]
    Normal,
    /// Verbose output with additional details
    Verbose,
}

impl LogLevel {
    /// Level selected by the `-q` / `-v` flags; quiet wins.
    pub fn from_flags(quiet: bool, verbose: bool) -> Self {
        if quiet {
            LogLevel::Quiet
        } else if verbose {
            LogLevel::Verbose
        } else {
            LogLevel::Normal
        }
    }
}

/// Log a message if the current level permits it
pub fn log(level: LogLevel, required: LogLevel, msg: &str) {
    if level != LogLevel::Quiet && (level == required || required == LogLevel::Normal) {
        println!("{msg}");
    }
}

/// Errors always reach stderr.
pub fn log_error(msg: &str) {
    eprintln!("{msg}");
}

/// One `event=<name> key=value ...` line.
pub fn format_event(event: &str, fields: &[(&str, &str)]) -> String {
    let mut line = format!("event={event}");
    for (key, value) in fields {
        if value.is_empty() || value.contains(char::is_whitespace) || value.contains('"') {
            let _ = write!(line, " {key}={value:?}");
        } else {
            let _ = write!(line, " {key}={value}");
        }
    }
    line
}

/// Emit a structured event line at `required` level.
pub fn log_event(level: LogLevel, required: LogLevel, event: &str, fields: &[(&str, &str)]) {
    log(level, required, &format_event(event, fields));
}
