//! CLI argument parsing
//!
//! # Usage
//!
//! ```bash
//! heartml init
//! heartml data import heart.csv --strict
//! heartml models add svc --params '{"kernel": "linear"}'
//! heartml models train <ID>
//! heartml serve --addr 0.0.0.0:5000
//! ```

mod core;
mod types;

pub use self::core::{
    parse_args, AddArgs, CheckArgs, Cli, Command, DataArgs, DataCommand, ImportArgs, ListArgs,
    ModelIdArgs, ModelsArgs, ModelsCommand, ServeArgs,
};
pub use self::types::OutputFormat;
