use bridge_proto::{WorkerError, WorkerErrorCode};
use thiserror::Error;

/// Errors surfaced to callers of the synchronous bridge.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// An argument or result cannot cross the worker boundary.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// The worker process could not be spawned.
    #[error("failed to spawn worker: {0}")]
    Spawn(std::io::Error),

    /// The worker process crashed or threw.
    #[error("worker failure: {0}")]
    Worker(String),

    /// The worker produced output that violates the protocol.
    #[error("protocol error: {0}")]
    Protocol(String),

    /// A remote API returned a non-success status.
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

    /// A requested capability has no behavior yet.
    #[error("not yet implemented: {method}")]
    NotYetImplemented {
        /// Name of the unimplemented method.
        method: String,
    },

    /// Configuration is missing or invalid.
    #[error("config error: {0}")]
    Config(String),

    /// I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl BridgeError {
    /// Map a wire-level worker error into the caller-side taxonomy.
    pub fn from_wire(error: WorkerError) -> Self {
        match error.code {
            WorkerErrorCode::SerializationError => BridgeError::Serialization(error.message),
            WorkerErrorCode::ApiCallFailure => BridgeError::ApiCall {
                status: error.status.unwrap_or(0),
                body: error.body.unwrap_or_default(),
            },
            WorkerErrorCode::AuthFailure => BridgeError::Auth(error.message),
            WorkerErrorCode::NotYetImplemented => BridgeError::NotYetImplemented {
                method: error.body.unwrap_or(error.message),
            },
            WorkerErrorCode::InvalidRequest | WorkerErrorCode::ProtocolError => {
                BridgeError::Protocol(error.message)
            }
            WorkerErrorCode::WorkerFailure | WorkerErrorCode::IoError => {
                BridgeError::Worker(error.message)
            }
        }
    }
}

/// Result type for bridge-runtime operations.
pub type Result<T> = std::result::Result<T, BridgeError>;
