//! # bridge-worker
//!
//! Worker-side executor for bridged operations.
//!
//! Each worker process is a short-lived isolate: it starts from a clean
//! environment, receives one JSON request on stdin, re-resolves everything
//! it needs (configuration, authentication, store files) from that request
//! and the `BRIDGE_` environment contract, executes the asynchronous
//! operation, and writes one JSON response to stdout before exiting.
//!
//! ## Operations
//!
//! - `init` — read the scopes manifest, authenticate, return a full snapshot
//! - `ensure_auth` — authenticate for the accumulated scope union
//! - `api_invoke` — invoke a named method on a named API surface
//! - `fetch_media` — buffer a streamed binary resource to bytes
//! - `http_fetch` — generic fetch with caller-selected response fields
//! - `store` — file-backed key/value operation

pub mod api;
pub mod auth;
pub mod exec;
pub mod fetch;
pub mod media;
pub mod store;

mod error;

pub use error::{Error, Result};
pub use exec::{execute, failure};
