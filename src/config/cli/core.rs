//! Core CLI types - Cli, Command, and argument structs

use clap::{Args, Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;

use super::types::OutputFormat;

/// heartml: heart-disease classifier registry and serving API
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "heartml")]
#[command(author = "PAIML")]
#[command(version)]
#[command(about = "Register, train and query heart-disease classifiers over a SQLite store")]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// SQLite database path (overrides HEARTML_DB_PATH)
    #[arg(long, global = true, value_name = "PATH")]
    pub db: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Run the HTTP API server
    Serve(ServeArgs),

    /// Manage registered models
    Models(ModelsArgs),

    /// Manage the live dataset
    Data(DataArgs),

    /// Create the database schema
    Init,
}

/// Arguments for the serve command
#[derive(Args, Debug, Clone, PartialEq)]
pub struct ServeArgs {
    /// Listen address (overrides HEARTML_ADDR)
    #[arg(long, value_name = "ADDR")]
    pub addr: Option<SocketAddr>,
}

/// Arguments for the models command
#[derive(Args, Debug, Clone, PartialEq)]
pub struct ModelsArgs {
    #[command(subcommand)]
    pub command: ModelsCommand,
}

/// Model subcommands
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum ModelsCommand {
    /// Register a new untrained model
    Add(AddArgs),

    /// List registered models
    List(ListArgs),

    /// Delete a model
    Delete(ModelIdArgs),

    /// Train a model on its training split
    Train(ModelIdArgs),

    /// Predict the held-out split of a trained model
    Predict(ModelIdArgs),
}

/// Arguments for `models add`
#[derive(Args, Debug, Clone, PartialEq)]
pub struct AddArgs {
    /// Algorithm variant (logreg, svc)
    #[arg(value_name = "NAME")]
    pub name: String,

    /// Hyperparameters as a JSON object
    #[arg(short, long, value_name = "JSON")]
    pub params: Option<String>,
}

/// Arguments for `models list`
#[derive(Args, Debug, Clone, PartialEq)]
pub struct ListArgs {
    /// Output format (text, json)
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,
}

/// A model id argument
#[derive(Args, Debug, Clone, PartialEq)]
pub struct ModelIdArgs {
    #[arg(value_name = "ID")]
    pub id: String,
}

/// Arguments for the data command
#[derive(Args, Debug, Clone, PartialEq)]
pub struct DataArgs {
    #[command(subcommand)]
    pub command: DataCommand,
}

/// Dataset subcommands
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum DataCommand {
    /// Replace the live dataset from a CSV file
    Import(ImportArgs),

    /// Run data-quality checks on a CSV file or the stored table
    Check(CheckArgs),
}

/// Arguments for `data import`
#[derive(Args, Debug, Clone, PartialEq)]
pub struct ImportArgs {
    /// CSV file with a header row
    #[arg(value_name = "CSV")]
    pub csv: PathBuf,

    /// Refuse to import when any quality check fails
    #[arg(long)]
    pub strict: bool,
}

/// Arguments for `data check`
#[derive(Args, Debug, Clone, PartialEq)]
pub struct CheckArgs {
    /// CSV file; the stored table when omitted
    #[arg(value_name = "CSV")]
    pub csv: Option<PathBuf>,
}

/// Parse command-line arguments
pub fn parse_args<I, T>(args: I) -> Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::try_parse_from(args)
}
