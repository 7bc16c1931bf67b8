//! Error types for the update check.

use thiserror::Error;

/// Error type for HTTP operations.
#[derive(Debug, Error)]
pub enum HttpError {
    /// Network connection failed (DNS, refused, TLS, ...).
    #[error("Connection error: {0}")]
    Connection(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The server did not respond in time.
    #[error("Request timed out")]
    Timeout,

    /// The provided URL is invalid.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

/// Why the latest release could not be determined.
#[derive(Debug, Error)]
pub enum UpdateError {
    /// The request failed.
    #[error(transparent)]
    Http(#[from] HttpError),

    /// The server answered with a non-success status.
    #[error("Release endpoint returned {0}")]
    Status(http::StatusCode),

    /// The body was not the expected release JSON.
    #[error("Unexpected release response: {0}")]
    Parse(#[source] serde_json::Error),

    /// A version string was not dotted numeric.
    #[error("Unrecognized version '{0}'")]
    Version(String),
}
