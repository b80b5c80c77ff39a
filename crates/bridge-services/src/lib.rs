//! # bridge-services
//!
//! Emulated host services layered over the synchronous bridge.
//!
//! These are thin adapters: they consume the bridge's fully materialized
//! results and present the emulated host's object model. This crate
//! provides:
//! - An explicit service registry (resolve-once-and-cache by name)
//! - The Blob payload object with charset round-tripping
//! - A structural pass-through over spreadsheet metadata
//! - A script-properties facade over the bridged key/value store
//!
//! ## Example
//!
//! ```ignore
//! use bridge_services::{Blob, ServiceRegistry};
//!
//! let registry = ServiceRegistry::new();
//! registry.register("Utilities", || ());
//!
//! let blob = Blob::from_text("hello").with_name("hello.txt");
//! assert_eq!(blob.content_type(), Some("text/plain"));
//! ```

mod blob;
mod error;
mod props;
mod registry;
mod sheet;
pub mod utils;

pub use blob::Blob;
pub use error::{not_yet_implemented, HostError, Result};
pub use props::PropertyStore;
pub use registry::ServiceRegistry;
pub use sheet::{
    GridProperties, RangeRef, Sheet, SheetMeta, SheetProperties, Spreadsheet, SpreadsheetMeta,
    SpreadsheetOp, SpreadsheetProperties,
};
