//! # bridge-runtime
//!
//! Caller-side synchronous execution bridge.
//!
//! This crate presents asynchronous work (HTTP fetches, authenticated API
//! calls, streamed downloads, persistent store operations) as synchronous
//! calls by delegating each operation to a fresh, isolated worker process
//! and blocking until it terminates.
//!
//! This crate provides:
//! - Worker process spawning with one isolate per call
//! - Scope accumulation and auth session lifecycle
//! - API, media, fetch, and store dispatchers
//! - Bootstrap initialization from a scopes manifest
//!
//! ## Example
//!
//! ```ignore
//! use bridge_runtime::{BridgeConfig, BridgeSession};
//!
//! let config = BridgeConfig::load("bridge.toml")?;
//! let mut session = BridgeSession::new(&config)?;
//! session.init("manifest.json")?;
//!
//! let reply = session.invoke("storage", "files", "list", serde_json::json!({}))?;
//! println!("{}", reply.data);
//! ```

mod auth;
mod config;
mod error;
mod runner;
mod session;

pub use auth::{AuthState, ScopeSet};
pub use config::{default_surfaces, AuthConfig, BridgeConfig, WorkerConfig};
pub use error::{BridgeError, Result};
pub use runner::WorkerRunner;
pub use session::{BridgeSession, MediaPayload};

// Re-export protocol types for convenience
pub use bridge_proto::{
    ApiReply, AuthSnapshot, FetchOptions, MediaReply, ResponseMeta, ScopesManifest, StoreMethod,
    SurfaceSpec, TokenInfo, WorkerOp,
};
