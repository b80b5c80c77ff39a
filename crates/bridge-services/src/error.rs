use bridge_runtime::BridgeError;
use thiserror::Error;

/// Errors from the emulated host services.
#[derive(Debug, Error)]
pub enum HostError {
    /// A recognised capability has no behavior yet.
    #[error("method '{method}' is not yet implemented")]
    NotYetImplemented {
        /// Name of the unimplemented method.
        method: String,
    },

    /// An A1-style range reference could not be resolved.
    #[error("invalid range: {0}")]
    InvalidRange(String),

    /// No service registered under the requested name.
    #[error("unknown service: {0}")]
    UnknownService(String),

    /// The registered service has a different type than requested.
    #[error("service '{0}' has a different type than requested")]
    ServiceType(String),

    /// Error from the bridge.
    #[error(transparent)]
    Bridge(#[from] BridgeError),

    /// Error from the protocol crate.
    #[error(transparent)]
    Proto(#[from] bridge_proto::Error),

    /// JSON decoding error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Deterministic "no behavior yet" signal carrying the method name.
pub fn not_yet_implemented(method: &str) -> HostError {
    HostError::NotYetImplemented {
        method: method.to_string(),
    }
}

/// Result type for bridge-services operations.
pub type Result<T> = std::result::Result<T, HostError>;
