//! Data command implementation

use super::open_store;
use crate::cli::logging::log;
use crate::cli::LogLevel;
use crate::config::{CheckArgs, DataArgs, DataCommand, ImportArgs, StoreConfig};
use crate::data::quality::{check_dataset, inspect_csv};
use crate::data::{Dataset, QualityReport, ReferenceStats};
use std::path::Path;

pub fn run_data(args: DataArgs, config: &StoreConfig, level: LogLevel) -> Result<(), String> {
    match args.command {
        DataCommand::Import(import) => run_import(import, config, level),
        DataCommand::Check(check) => run_check(check, config, level),
    }
}

fn run_import(args: ImportArgs, config: &StoreConfig, level: LogLevel) -> Result<(), String> {
    let bytes = read_csv(&args.csv)?;
    let report = inspect_csv(bytes.as_slice(), &ReferenceStats::default())
        .map_err(|e| format!("Failed to read {}: {e}", args.csv.display()))?;
    log(level, LogLevel::Normal, &format_report(&report));

    if args.strict && !report.passed() {
        return Err(format!(
            "Refusing import: {} quality check(s) failed",
            report.issues.len()
        ));
    }

    let dataset = Dataset::from_csv_reader(bytes.as_slice())
        .map_err(|e| format!("Failed to parse {}: {e}", args.csv.display()))?;
    let store = open_store(config)?;
    let rows = store.replace_dataset(&dataset).map_err(|e| e.to_string())?;

    log(level, LogLevel::Normal, &format!("Imported {rows} rows"));
    log(level, LogLevel::Verbose, &format!("  Fingerprint: {}", dataset.fingerprint()));
    Ok(())
}

fn run_check(args: CheckArgs, config: &StoreConfig, level: LogLevel) -> Result<(), String> {
    let reference = ReferenceStats::default();
    let report = match &args.csv {
        Some(path) => {
            let bytes = read_csv(path)?;
            inspect_csv(bytes.as_slice(), &reference)
                .map_err(|e| format!("Failed to read {}: {e}", path.display()))?
        }
        None => {
            let store = open_store(config)?;
            let columns = store.data_columns().map_err(|e| e.to_string())?;
            let dataset = store.load_dataset().map_err(|e| e.to_string())?;
            check_dataset(&dataset, &columns, &reference)
        }
    };

    log(level, LogLevel::Normal, &format_report(&report));
    if report.passed() {
        Ok(())
    } else {
        Err(format!("{} quality check(s) failed", report.issues.len()))
    }
}

fn read_csv(path: &Path) -> Result<Vec<u8>, String> {
    std::fs::read(path).map_err(|e| format!("Failed to read {}: {e}", path.display()))
}

/// Human-readable quality report
pub fn format_report(report: &QualityReport) -> String {
    let mut lines = vec![format!("Rows: {}", report.rows)];
    if let Some(mean) = report.label_mean {
        lines.push(format!("Label mean: {mean:.4}"));
    }
    if report.passed() {
        lines.push("All quality checks passed".to_string());
    } else {
        lines.push(format!("{} issue(s):", report.issues.len()));
        lines.extend(report.issues.iter().map(|issue| format!("  - {issue}")));
    }
    lines.join("\n")
}
