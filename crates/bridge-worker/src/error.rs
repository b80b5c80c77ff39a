use bridge_proto::{WorkerError, WorkerErrorCode};
use thiserror::Error;

/// Errors from the worker-side executor.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP client error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Transport-level failure reaching a remote API.
    #[error("network failure: {0}")]
    Network(String),

    /// Remote API returned a non-success status.
    #[error("api call failed with status {status}")]
    ApiCall {
        /// HTTP status code.
        status: u16,
        /// Response body.
        body: String,
    },

    /// Scope resolution or token acquisition failed.
    #[error("auth failure: {0}")]
    Auth(String),

    /// Malformed or unsupported request.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Key/value store error.
    #[error("store error: {0}")]
    Store(String),

    /// Error from the protocol crate.
    #[error(transparent)]
    Proto(#[from] bridge_proto::Error),
}

impl Error {
    /// Reduce to the wire-level error carried back to the caller.
    pub fn to_wire(&self) -> WorkerError {
        match self {
            Error::ApiCall { status, body } => WorkerError::api_failure(*status, body.clone()),
            Error::Network(message) => WorkerError {
                code: WorkerErrorCode::ApiCallFailure,
                message: format!("network failure: {}", message),
                status: None,
                body: None,
            },
            Error::Auth(message) => WorkerError::new(WorkerErrorCode::AuthFailure, message.clone()),
            Error::InvalidRequest(message) => {
                WorkerError::new(WorkerErrorCode::InvalidRequest, message.clone())
            }
            Error::Io(err) => WorkerError::new(WorkerErrorCode::IoError, err.to_string()),
            Error::Store(message) => WorkerError::new(WorkerErrorCode::IoError, message.clone()),
            Error::Json(err) => {
                WorkerError::new(WorkerErrorCode::SerializationError, err.to_string())
            }
            Error::Proto(err @ bridge_proto::Error::Boundary(_)) => {
                WorkerError::new(WorkerErrorCode::SerializationError, err.to_string())
            }
            Error::Proto(err) => WorkerError::new(WorkerErrorCode::WorkerFailure, err.to_string()),
            Error::Http(err) => WorkerError::new(WorkerErrorCode::WorkerFailure, err.to_string()),
        }
    }
}

/// Result type for bridge-worker operations.
pub type Result<T> = std::result::Result<T, Error>;
