//! Configuration management for the tabs server.
//!
//! Loads configuration from environment variables with sensible defaults.
//! Unset variables fall back to their default; set but unparsable ones are
//! an error.

use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;
use std::time::Duration;
use tabs_postgres::PostgresConfig;
use thiserror::Error;

/// Tracing filter used when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "info,tabs_server=debug,tabs_web=debug,sqlx=warn";

/// Errors raised while loading configuration.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// A variable is set to something that does not parse.
    #[error("Invalid value for {key}: {value:?}")]
    InvalidValue {
        /// Environment variable name
        key: &'static str,
        /// Raw value found
        value: String,
    },

    /// Pool bounds are inverted.
    #[error("DATABASE_MIN_CONNECTIONS ({min}) exceeds DATABASE_MAX_CONNECTIONS ({max})")]
    PoolBounds {
        /// Configured minimum
        min: u32,
        /// Configured maximum
        max: u32,
    },
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// `PostgreSQL` configuration
    pub postgres: PostgresConfig,
    /// HTTP server configuration
    pub server: ServerConfig,
    /// Apply bundled migrations at start-up (`RUN_MIGRATIONS`)
    pub run_migrations: bool,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,
    /// Port to bind to
    pub port: u16,
    /// Tracing filter directives
    pub log_level: String,
    /// Graceful shutdown timeout in seconds
    pub shutdown_timeout: u64,
}

impl ServerConfig {
    /// `host:port` to bind.
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// How long in-flight requests get to finish after a shutdown signal.
    #[must_use]
    pub const fn shutdown_grace(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            log_level: DEFAULT_LOG_FILTER.to_string(),
            shutdown_timeout: 30,
        }
    }
}

impl Config {
    /// Load configuration from the process environment.
    ///
    /// # Errors
    ///
    /// See [`Config::from_lookup`].
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through `lookup`, which maps a variable name to its
    /// value.
    ///
    /// # Errors
    ///
    /// - `InvalidValue`: a numeric or boolean variable does not parse
    /// - `PoolBounds`: minimum pool size above the maximum
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let pg = PostgresConfig::default();
        let server = ServerConfig::default();

        let postgres = PostgresConfig {
            url: lookup("DATABASE_URL").unwrap_or(pg.url),
            max_connections: parsed(&lookup, "DATABASE_MAX_CONNECTIONS", pg.max_connections)?,
            min_connections: parsed(&lookup, "DATABASE_MIN_CONNECTIONS", pg.min_connections)?,
            connect_timeout: parsed(&lookup, "DATABASE_CONNECT_TIMEOUT", pg.connect_timeout)?,
            idle_timeout: parsed(&lookup, "DATABASE_IDLE_TIMEOUT", pg.idle_timeout)?,
        };

        if postgres.min_connections > postgres.max_connections {
            return Err(ConfigError::PoolBounds {
                min: postgres.min_connections,
                max: postgres.max_connections,
            });
        }

        Ok(Self {
            postgres,
            server: ServerConfig {
                host: lookup("HOST").unwrap_or(server.host),
                port: parsed(&lookup, "PORT", server.port)?,
                log_level: lookup("RUST_LOG").unwrap_or(server.log_level),
                shutdown_timeout: parsed(&lookup, "SHUTDOWN_TIMEOUT", server.shutdown_timeout)?,
            },
            run_migrations: parsed(&lookup, "RUN_MIGRATIONS", true)?,
        })
    }
}

fn parsed<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { key, value }),
    }
}
