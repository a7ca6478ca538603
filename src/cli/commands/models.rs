//! Models command implementation

use super::open_registry;
use crate::cli::logging::log;
use crate::cli::LogLevel;
use crate::config::{ModelsArgs, ModelsCommand, OutputFormat, StoreConfig};
use crate::server::NO_MODELS;
use crate::storage::ModelSummary;
use std::collections::BTreeMap;

pub fn run_models(args: ModelsArgs, config: &StoreConfig, level: LogLevel) -> Result<(), String> {
    let registry = open_registry(config)?;

    match args.command {
        ModelsCommand::Add(add) => {
            let outcome = registry
                .add_model(&add.name, add.params.as_deref())
                .map_err(|e| e.to_string())?;
            log(level, LogLevel::Normal, &outcome.message);
        }
        ModelsCommand::List(list) => {
            let models = registry.list_models().map_err(|e| e.to_string())?;
            log(level, LogLevel::Normal, &format_listing(&models, list.format)?);
        }
        ModelsCommand::Delete(target) => {
            let message = registry.delete_model(&target.id).map_err(|e| e.to_string())?;
            log(level, LogLevel::Normal, &message);
        }
        ModelsCommand::Train(target) => {
            let outcome = registry.train_model(&target.id).map_err(|e| e.to_string())?;
            log(level, LogLevel::Verbose, &outcome.fit_message);
            log(level, LogLevel::Normal, &outcome.message);
            log(level, LogLevel::Verbose, &format!("  Version: {}", outcome.model_version));
        }
        ModelsCommand::Predict(target) => {
            let predictions = registry.predict_model(&target.id).map_err(|e| e.to_string())?;
            log(level, LogLevel::Verbose, &format!("{} predictions", predictions.len()));
            let line = serde_json::to_string(&predictions)
                .map_err(|e| format!("Failed to encode predictions: {e}"))?;
            log(level, LogLevel::Normal, &line);
        }
    }
    Ok(())
}

/// Render the model listing
pub fn format_listing(
    models: &BTreeMap<String, ModelSummary>,
    format: OutputFormat,
) -> Result<String, String> {
    match format {
        OutputFormat::Json if models.is_empty() => {
            serde_json::to_string(NO_MODELS).map_err(|e| e.to_string())
        }
        OutputFormat::Json => {
            serde_json::to_string_pretty(models).map_err(|e| format!("Failed to encode: {e}"))
        }
        OutputFormat::Text if models.is_empty() => Ok(NO_MODELS.to_string()),
        OutputFormat::Text => Ok(models
            .iter()
            .map(|(id, m)| {
                let status = if m.model_is_trained { "trained" } else { "untrained" };
                format!("{id}  {:<6}  {status:<9}  {}", m.model_name, m.model_params)
            })
            .collect::<Vec<_>>()
            .join("\n")),
    }
}
