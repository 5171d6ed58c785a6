//! Error types for the controller and its configuration.

use thiserror::Error;

/// Boxed driver error kept as the cause of a failed connect.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result alias used throughout the controller API.
pub type Result<T, E = ControllerError> = std::result::Result<T, E>;

/// Errors raised by [`ConnectionController`](crate::ConnectionController).
#[derive(Debug, Error)]
pub enum ControllerError {
    /// The driver failed to establish a connection.
    #[error("Cannot connect to database")]
    Connection {
        #[source]
        source: BoxError,
    },

    /// A guarded operation was called while disconnected.
    #[error("Not connected to database")]
    NotConnected,
}

impl ControllerError {
    pub(crate) fn connection<E>(source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Connection {
            source: Box::new(source),
        }
    }
}

/// Errors raised while loading [`MongoConfig`](crate::config::MongoConfig).
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{var} has an invalid value: {value:?}")]
    Invalid { var: &'static str, value: String },
}
