//! # bridge-proto
//!
//! Wire protocol and serialization boundary for bridged worker calls.
//!
//! This crate provides:
//! - Request/response structures exchanged with worker processes
//! - Serialization boundary validation (depth and size limits)
//! - Base64 codecs for byte payloads and charset round-tripping for text
//! - Scopes manifest parsing
//!
//! ## Example
//!
//! ```ignore
//! use bridge_proto::{boundary, WorkerOp, WorkerRequest, WORKER_PROTOCOL_VERSION};
//!
//! let request = WorkerRequest {
//!     version: WORKER_PROTOCOL_VERSION.to_string(),
//!     request_id: "worker-1".to_string(),
//!     op: WorkerOp::EnsureAuth { scopes: vec!["scope.read".to_string()] },
//! };
//!
//! let value = serde_json::to_value(&request)?;
//! boundary::check_value(&value)?;
//! ```

pub mod boundary;
mod charset;
mod error;
mod manifest;
mod protocol;

pub use charset::Charset;
pub use error::{Error, Result};
pub use manifest::ScopesManifest;
pub use protocol::{
    ApiReply, AuthSnapshot, FetchOptions, MediaReply, ResponseMeta, StoreMethod, SurfaceSpec,
    TokenInfo, WorkerError, WorkerErrorCode, WorkerOp, WorkerRequest, WorkerResponse,
    WORKER_PROTOCOL_VERSION,
};
