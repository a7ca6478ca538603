//! Configuration: command-line arguments and runtime settings.

mod cli;
mod store;

pub use cli::{
    parse_args, AddArgs, CheckArgs, Cli, Command, DataArgs, DataCommand, ImportArgs, ListArgs,
    ModelIdArgs, ModelsArgs, ModelsCommand, OutputFormat, ServeArgs,
};
pub use store::{
    AppConfig, ConfigError, Overrides, StoreConfig, DEFAULT_DB_PATH, ENV_ADDR, ENV_DB_PATH,
    ENV_RUNTIME_DOCKER,
};
