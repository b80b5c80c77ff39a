use thiserror::Error;

/// Errors from protocol construction and boundary validation.
#[derive(Debug, Error)]
pub enum Error {
    /// A value cannot be represented across the worker boundary.
    #[error("serialization boundary violation: {0}")]
    Boundary(String),

    /// A charset label is not recognised.
    #[error("unsupported charset: {0}")]
    UnknownCharset(String),

    /// Text could not be round-tripped in the requested charset.
    #[error("encoding error: {0}")]
    Encoding(String),

    /// Error parsing or validating the scopes manifest.
    #[error("manifest error: {0}")]
    Manifest(String),

    /// I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error.
    #[error("json parsing error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for bridge-proto operations.
pub type Result<T> = std::result::Result<T, Error>;
