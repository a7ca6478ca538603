//! Runtime configuration resolved once at startup.

use crate::server::ServerConfig;
use std::net::SocketAddr;
use std::path::PathBuf;
use thiserror::Error;

/// Marks a containerized deployment; the database path must then be explicit.
pub const ENV_RUNTIME_DOCKER: &str = "HEARTML_RUNTIME_DOCKER";
pub const ENV_DB_PATH: &str = "HEARTML_DB_PATH";
pub const ENV_ADDR: &str = "HEARTML_ADDR";

/// Local database file used outside containers.
pub const DEFAULT_DB_PATH: &str = "./heartml.db";

/// Configuration errors
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingVar(String),

    #[error("Invalid value for {name}: {value:?} ({reason})")]
    InvalidVar { name: String, value: String, reason: String },
}

/// Result type for configuration
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Where the store lives
#[derive(Debug, Clone, PartialEq)]
pub struct StoreConfig {
    pub path: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self { path: PathBuf::from(DEFAULT_DB_PATH) }
    }
}

impl StoreConfig {
    /// Resolve from the process environment; `db_path` comes from `--db`
    pub fn from_env(db_path: Option<PathBuf>) -> Result<Self> {
        Self::from_lookup(&env_lookup, db_path)
    }

    /// Resolve from an arbitrary variable lookup. A flag path wins, so the
    /// container check only applies when no flag was given.
    pub fn from_lookup<F>(lookup: &F, db_path: Option<PathBuf>) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = db_path {
            return Ok(Self { path });
        }
        if present(lookup, ENV_RUNTIME_DOCKER).is_some() {
            let path = present(lookup, ENV_DB_PATH)
                .ok_or_else(|| ConfigError::MissingVar(ENV_DB_PATH.to_string()))?;
            return Ok(Self { path: PathBuf::from(path) });
        }
        Ok(present(lookup, ENV_DB_PATH)
            .map(|path| Self { path: PathBuf::from(path) })
            .unwrap_or_default())
    }
}

/// Values given on the command line; each one shadows its variable
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Overrides {
    pub db_path: Option<PathBuf>,
    pub address: Option<SocketAddr>,
}

/// Everything the server needs to run
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppConfig {
    pub store: StoreConfig,
    pub server: ServerConfig,
}

impl AppConfig {
    /// Resolve from the process environment
    pub fn from_env(overrides: Overrides) -> Result<Self> {
        Self::from_lookup(env_lookup, overrides)
    }

    /// Resolve from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F, overrides: Overrides) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let store = StoreConfig::from_lookup(&lookup, overrides.db_path)?;
        let address = match overrides.address {
            Some(addr) => addr,
            None => match present(&lookup, ENV_ADDR) {
                Some(addr) => parse_addr(&addr)?,
                None => ServerConfig::default().address,
            },
        };
        Ok(Self { store, server: ServerConfig::default().with_address(address) })
    }
}

fn env_lookup(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

/// Blank values count as unset.
fn present<F>(lookup: &F, name: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(name).filter(|v| !v.trim().is_empty())
}

fn parse_addr(value: &str) -> Result<SocketAddr> {
    value.trim().parse().map_err(|e| ConfigError::InvalidVar {
        name: ENV_ADDR.to_string(),
        value: value.to_string(),
        reason: format!("{e}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |name| map.get(name).cloned()
    }

    fn flags(db: Option<&str>, addr: Option<&str>) -> Overrides {
        Overrides {
            db_path: db.map(PathBuf::from),
            address: addr.map(|a| a.parse().expect("valid addr")),
        }
    }

    #[test]
    fn test_local_default() {
        let config = AppConfig::from_lookup(lookup(&[]), Overrides::default())
            .expect("operation should succeed");
        assert_eq!(config.store.path, PathBuf::from(DEFAULT_DB_PATH));
        assert_eq!(config.server.address.port(), 5000);
    }

    #[test]
    fn test_docker_requires_db_path() {
        let result = StoreConfig::from_lookup(&lookup(&[(ENV_RUNTIME_DOCKER, "1")]), None);
        assert_eq!(result, Err(ConfigError::MissingVar(ENV_DB_PATH.to_string())));
    }

    #[test]
    fn test_docker_with_db_path() {
        let config = StoreConfig::from_lookup(
            &lookup(&[(ENV_RUNTIME_DOCKER, "true"), (ENV_DB_PATH, "/data/heartml.db")]),
            None,
        )
        .expect("operation should succeed");
        assert_eq!(config.path, PathBuf::from("/data/heartml.db"));
    }

    #[test]
    fn test_docker_accepts_db_flag() {
        let config = StoreConfig::from_lookup(
            &lookup(&[(ENV_RUNTIME_DOCKER, "1")]),
            Some(PathBuf::from("/flag.db")),
        )
        .expect("operation should succeed");
        assert_eq!(config.path, PathBuf::from("/flag.db"));
    }

    #[test]
    fn test_blank_docker_flag_is_unset() {
        let config = StoreConfig::from_lookup(&lookup(&[(ENV_RUNTIME_DOCKER, " ")]), None)
            .expect("operation should succeed");
        assert_eq!(config, StoreConfig::default());
    }

    #[test]
    fn test_addr_from_env() {
        let config = AppConfig::from_lookup(lookup(&[(ENV_ADDR, "0.0.0.0:8000")]), Overrides::default())
            .expect("operation should succeed");
        assert_eq!(config.server.address.port(), 8000);

        let bad = AppConfig::from_lookup(lookup(&[(ENV_ADDR, "nowhere")]), Overrides::default());
        assert!(matches!(bad, Err(ConfigError::InvalidVar { .. })));
    }

    #[test]
    fn test_store_ignores_bad_addr() {
        let config = StoreConfig::from_lookup(&lookup(&[(ENV_ADDR, "nowhere")]), None)
            .expect("operation should succeed");
        assert_eq!(config, StoreConfig::default());
    }

    #[test]
    fn test_flags_override_env() {
        let env = [(ENV_DB_PATH, "/env.db"), (ENV_ADDR, "nowhere")];
        let config = AppConfig::from_lookup(lookup(&env), flags(Some("/flag.db"), Some("127.0.0.1:9000")))
            .expect("operation should succeed");
        assert_eq!(config.store.path, PathBuf::from("/flag.db"));
        assert_eq!(config.server.address.port(), 9000);

        let from_env = AppConfig::from_lookup(lookup(&[(ENV_DB_PATH, "/env.db")]), flags(None, None))
            .expect("operation should succeed");
        assert_eq!(from_env.store.path, PathBuf::from("/env.db"));
    }
}
