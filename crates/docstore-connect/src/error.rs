//! Error types for the docstore adapter.
//!
//! Provides a unified error type covering endpoint configuration, client
//! resolution, remote calls, serialization, and route runtime errors.

use docstore_client::ClientError;
use thiserror::Error;

/// Errors that can occur in the adapter.
#[derive(Debug, Error)]
pub enum ConnectorError {
    /// Invalid or missing endpoint configuration.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// No data client registered for the endpoint's host.
    #[error("No data client registered for host '{0}'")]
    ClientNotRegistered(String),

    /// The remote call failed; the client's error is carried unchanged.
    #[error("Client error: {0}")]
    Client(#[from] ClientError),

    /// Message or response body could not be (de)serialized.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Error in the route runtime.
    #[error("Runtime error: {0}")]
    RuntimeError(String),
}

/// Result type alias for adapter operations.
pub type Result<T> = std::result::Result<T, ConnectorError>;

impl From<serde_json::Error> for ConnectorError {
    fn from(e: serde_json::Error) -> Self {
        ConnectorError::SerializationError(e.to_string())
    }
}
