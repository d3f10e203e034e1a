//! Server settings read from the environment (and `.env`, when present).

use std::env;
use std::time::Duration;

use thiserror::Error;

use crate::domain::selection::{SelectionPolicy, UnknownSelectionPolicy};

const DEFAULT_DATABASE_URL: &str = "app.db";
const DEFAULT_ADDRESS: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_LOOKUP_TIMEOUT_MS: u64 = 5000;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} must be a {expected}, got `{value}`")]
    InvalidValue {
        name: &'static str,
        expected: &'static str,
        value: String,
    },
    #[error(transparent)]
    SelectionPolicy(#[from] UnknownSelectionPolicy),
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub database_url: String,
    pub address: String,
    pub port: u16,
    /// Deadline applied to every price lookup.
    pub lookup_timeout: Duration,
    pub selection_policy: SelectionPolicy,
    /// CSV file imported once at start-up.
    pub seed_csv: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            address: DEFAULT_ADDRESS.to_string(),
            port: DEFAULT_PORT,
            lookup_timeout: Duration::from_millis(DEFAULT_LOOKUP_TIMEOUT_MS),
            selection_policy: SelectionPolicy::default(),
            seed_csv: None,
        }
    }
}

impl ServerConfig {
    /// Load settings from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load settings through `lookup`, falling back to defaults for unset keys.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let port = match lookup("PORT") {
            Some(value) => value.trim().parse::<u16>().map_err(|_| ConfigError::InvalidValue {
                name: "PORT",
                expected: "port number",
                value,
            })?,
            None => defaults.port,
        };

        let lookup_timeout = match lookup("LOOKUP_TIMEOUT_MS") {
            Some(value) => match value.trim().parse::<u64>() {
                Ok(millis) if millis > 0 => Duration::from_millis(millis),
                _ => {
                    return Err(ConfigError::InvalidValue {
                        name: "LOOKUP_TIMEOUT_MS",
                        expected: "positive number of milliseconds",
                        value,
                    });
                }
            },
            None => defaults.lookup_timeout,
        };

        let selection_policy = match lookup("PRICE_SELECTION") {
            Some(value) => value.parse::<SelectionPolicy>()?,
            None => defaults.selection_policy,
        };

        Ok(Self {
            database_url: lookup("DATABASE_URL").unwrap_or(defaults.database_url),
            address: lookup("ADDRESS").unwrap_or(defaults.address),
            port,
            lookup_timeout,
            selection_policy,
            seed_csv: lookup("SEED_CSV").filter(|path| !path.trim().is_empty()),
        })
    }
}
