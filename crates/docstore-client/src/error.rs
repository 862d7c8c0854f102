//! Error types for the docstore client.

use thiserror::Error;

/// Errors that can occur while talking to a document data service.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Failed to reach the service (DNS, TCP, TLS, timeout).
    #[error("Connection error: {0}")]
    Connection(String),

    /// The service answered with a non-success status.
    #[error("Data service returned {status}: {body}")]
    Api { status: u16, body: String },

    /// Request or response body could not be (de)serialized.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;

impl From<serde_json::Error> for ClientError {
    fn from(e: serde_json::Error) -> Self {
        ClientError::Serialization(e.to_string())
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        ClientError::Connection(e.to_string())
    }
}
