//! Connection configuration.
//!
//! [`ConnectOptions`] are applied on top of the options parsed from a
//! connection string. [`MongoConfig`] loads a full configuration from
//! environment variables for binaries; the controller itself never reads the
//! environment.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use mongodb::options::ClientOptions;
use serde::Deserialize;

use crate::error::ConfigError;

/// Overrides for the client options parsed from a URI.
///
/// Only fields that are set replace values from the connection string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ConnectOptions {
    /// Application name reported to the server.
    pub app_name: Option<String>,

    /// Timeout for establishing a single connection.
    pub connect_timeout_ms: Option<u64>,

    /// How long to wait for a suitable server before an operation fails.
    pub server_selection_timeout_ms: Option<u64>,

    pub max_pool_size: Option<u32>,
    pub min_pool_size: Option<u32>,

    /// Idle connections are closed after this duration.
    pub max_idle_time_ms: Option<u64>,
}

impl ConnectOptions {
    /// Set the application name (builder pattern).
    #[must_use]
    pub fn app_name(mut self, name: impl Into<String>) -> Self {
        self.app_name = Some(name.into());
        self
    }

    #[must_use]
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout_ms = Some(duration_ms(timeout));
        self
    }

    #[must_use]
    pub fn server_selection_timeout(mut self, timeout: Duration) -> Self {
        self.server_selection_timeout_ms = Some(duration_ms(timeout));
        self
    }

    #[must_use]
    pub fn max_pool_size(mut self, size: u32) -> Self {
        self.max_pool_size = Some(size);
        self
    }

    #[must_use]
    pub fn min_pool_size(mut self, size: u32) -> Self {
        self.min_pool_size = Some(size);
        self
    }

    #[must_use]
    pub fn max_idle_time(mut self, idle: Duration) -> Self {
        self.max_idle_time_ms = Some(duration_ms(idle));
        self
    }

    /// Apply the overrides to options parsed from a connection string.
    pub fn apply(&self, options: &mut ClientOptions) {
        if let Some(name) = &self.app_name {
            options.app_name = Some(name.clone());
        }
        if let Some(ms) = self.connect_timeout_ms {
            options.connect_timeout = Some(Duration::from_millis(ms));
        }
        if let Some(ms) = self.server_selection_timeout_ms {
            options.server_selection_timeout = Some(Duration::from_millis(ms));
        }
        if let Some(size) = self.max_pool_size {
            options.max_pool_size = Some(size);
        }
        if let Some(size) = self.min_pool_size {
            options.min_pool_size = Some(size);
        }
        if let Some(ms) = self.max_idle_time_ms {
            options.max_idle_time = Some(Duration::from_millis(ms));
        }
    }
}

fn duration_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

/// Connection settings loaded from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MongoConfig {
    pub uri: String,
    pub database: String,
    pub options: ConnectOptions,
}

impl MongoConfig {
    /// Load configuration from environment variables (and `.env`, if present).
    ///
    /// # Errors
    /// Returns an error if `MONGODB_URI` is unset or a numeric variable
    /// does not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let uri = lookup("MONGODB_URI")
            .filter(|s| !s.trim().is_empty())
            .ok_or(ConfigError::Missing("MONGODB_URI"))?;

        let database = lookup("MONGODB_DATABASE")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| "test".to_string());

        let options = ConnectOptions {
            app_name: lookup("MONGODB_APP_NAME").filter(|s| !s.is_empty()),
            connect_timeout_ms: parse_var(&lookup, "MONGODB_CONNECT_TIMEOUT_MS")?,
            server_selection_timeout_ms: parse_var(
                &lookup,
                "MONGODB_SERVER_SELECTION_TIMEOUT_MS",
            )?,
            max_pool_size: parse_var(&lookup, "MONGODB_MAX_POOL_SIZE")?,
            min_pool_size: parse_var(&lookup, "MONGODB_MIN_POOL_SIZE")?,
            max_idle_time_ms: parse_var(&lookup, "MONGODB_MAX_IDLE_TIME_MS")?,
        };

        Ok(Self {
            uri,
            database,
            options,
        })
    }
}

fn parse_var<F, T>(lookup: &F, var: &'static str) -> Result<Option<T>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(var) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Invalid { var, value }),
    }
}
