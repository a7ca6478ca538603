//! heartml CLI
//!
//! # Usage
//!
//! ```bash
//! # Create the database and load the dataset
//! heartml init
//! heartml data import heart.csv
//!
//! # Register and train a model
//! heartml models add logreg
//! heartml models train <ID>
//!
//! # Serve the HTTP API
//! heartml serve --addr 0.0.0.0:5000
//! ```

use clap::Parser;
use heartml::cli::{run_command, Cli};
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run_command(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
