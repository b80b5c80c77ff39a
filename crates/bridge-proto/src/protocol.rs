use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Protocol version for worker communication.
pub const WORKER_PROTOCOL_VERSION: &str = "bridge.v1";

/// A remote API family a worker can build an authenticated client for.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurfaceSpec {
    /// Surface name (e.g., "storage", "sheets").
    pub name: String,
    /// Base URL all operation paths are resolved against.
    pub base_url: String,
    /// Scopes this surface requires.
    #[serde(default)]
    pub scopes: Vec<String>,
    /// Path template for streamed media downloads, with `{id}` substituted.
    #[serde(default)]
    pub media_path: Option<String>,
}

impl SurfaceSpec {
    /// Resolve the media download path for a resource id.
    pub fn media_path_for(&self, resource_id: &str) -> String {
        let template = self.media_path.as_deref().unwrap_or("files/{id}");
        template.replace("{id}", resource_id)
    }
}

/// Options for a generic HTTP fetch performed inside a worker.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FetchOptions {
    /// HTTP method; defaults to GET.
    #[serde(default)]
    pub method: Option<String>,
    /// Request headers.
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
    /// Content type for the request body.
    #[serde(default)]
    pub content_type: Option<String>,
    /// Request body as text.
    #[serde(default)]
    pub payload: Option<String>,
    /// Bearer token for token-bearing calls.
    #[serde(default)]
    pub bearer_token: Option<String>,
}

/// Methods supported by the key/value store bridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreMethod {
    /// Read a value by key.
    Get,
    /// Write a value under a key.
    Set,
    /// Remove a key.
    Delete,
    /// List all keys.
    Keys,
}

/// Operations a worker process can execute.
///
/// Every variant is self-contained: a worker inherits nothing from the
/// caller and must re-resolve all state from these fields alone.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", content = "args", rename_all = "snake_case")]
pub enum WorkerOp {
    /// Read the scopes manifest, authenticate, and return a full snapshot.
    Init {
        /// Path to the manifest file.
        manifest_path: String,
    },
    /// Authenticate for the accumulated scope union.
    EnsureAuth {
        /// Full accumulated scope set.
        scopes: Vec<String>,
    },
    /// Invoke a named method on a named API surface.
    ApiInvoke {
        /// Surface to construct a client for.
        surface: SurfaceSpec,
        /// Property path on the surface (e.g., "files").
        prop: String,
        /// Method name (e.g., "list").
        method: String,
        /// Operation parameters.
        params: Value,
        /// Full accumulated scope set.
        scopes: Vec<String>,
    },
    /// Fetch a streamed binary resource, fully buffered inside the worker.
    FetchMedia {
        /// Surface to download from.
        surface: SurfaceSpec,
        /// Resource identifier.
        resource_id: String,
        /// Full accumulated scope set.
        scopes: Vec<String>,
    },
    /// Perform a generic HTTP fetch and project selected response fields.
    HttpFetch {
        /// Target URL.
        url: String,
        /// Request options.
        options: FetchOptions,
        /// Response fields to extract.
        response_fields: Vec<String>,
    },
    /// Run a key/value store operation.
    Store {
        /// Store root directory.
        root: String,
        /// Store namespace.
        namespace: String,
        /// Method to apply.
        method: StoreMethod,
        /// Method arguments.
        args: Vec<Value>,
    },
}

/// Request structure sent to a worker process.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerRequest {
    /// Protocol version.
    pub version: String,
    /// Unique request identifier.
    pub request_id: String,
    /// Operation to execute.
    #[serde(flatten)]
    pub op: WorkerOp,
}

/// Response structure from a worker process.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerResponse {
    /// Protocol version.
    pub version: String,
    /// Matching request identifier.
    pub request_id: String,
    /// Whether the operation succeeded.
    pub ok: bool,
    /// Optional result data.
    pub result: Option<Value>,
    /// Optional error information.
    pub error: Option<WorkerError>,
}

/// Error codes for worker operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkerErrorCode {
    /// An argument or result cannot cross the boundary.
    SerializationError,
    /// The worker crashed or threw.
    WorkerFailure,
    /// A remote API returned a non-success status.
    ApiCallFailure,
    /// Scope resolution or token acquisition failed.
    AuthFailure,
    /// A requested capability has no behavior.
    NotYetImplemented,
    /// Malformed request.
    InvalidRequest,
    /// Protocol violation.
    ProtocolError,
    /// I/O error.
    IoError,
}

/// Error information from worker operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerError {
    /// Error code.
    pub code: WorkerErrorCode,
    /// Human-readable message.
    pub message: String,
    /// HTTP status for API call failures.
    #[serde(default)]
    pub status: Option<u16>,
    /// Response body for API call failures.
    #[serde(default)]
    pub body: Option<String>,
}

impl WorkerError {
    /// Create a new worker error.
    pub fn new(code: WorkerErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            status: None,
            body: None,
        }
    }

    /// Create an API call failure carrying status and body.
    pub fn api_failure(status: u16, body: impl Into<String>) -> Self {
        Self {
            code: WorkerErrorCode::ApiCallFailure,
            message: format!("api call failed with status {}", status),
            status: Some(status),
            body: Some(body.into()),
        }
    }
}

/// Finite, serializable projection of an HTTP response's status and headers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseMeta {
    /// HTTP status code.
    pub status: u16,
    /// Canonical reason phrase, empty when unknown.
    #[serde(default)]
    pub status_text: String,
    /// Response headers.
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
}

impl ResponseMeta {
    /// Whether the status indicates success.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Result of an API surface invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiReply {
    /// Decoded response data.
    pub data: Value,
    /// Response metadata projection.
    pub meta: ResponseMeta,
}

/// Result of a streamed media fetch, fully buffered inside the worker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaReply {
    /// Base64-encoded bytes, absent when the fetch did not succeed.
    pub data: Option<String>,
    /// Response metadata projection.
    pub meta: ResponseMeta,
}

/// Token introspection metadata.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TokenInfo {
    /// Space-separated scopes the token carries.
    #[serde(default)]
    pub scope: Option<String>,
    /// Seconds until expiry.
    #[serde(default)]
    pub expires_in: Option<i64>,
    /// Audience the token was issued for.
    #[serde(default)]
    pub audience: Option<String>,
    /// Absolute expiry, computed by the worker that obtained the token.
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
    /// Any additional introspection fields.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl TokenInfo {
    /// Scopes the token carries, split from the introspection response.
    pub fn scopes(&self) -> Vec<String> {
        self.scope
            .as_deref()
            .map(|s| s.split_whitespace().map(str::to_string).collect())
            .unwrap_or_default()
    }
}

/// Authentication state returned by a worker, applied atomically by the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSnapshot {
    /// Scopes the worker authenticated for.
    #[serde(default)]
    pub scopes: Vec<String>,
    /// Fresh access token.
    pub access_token: String,
    /// Resolved project identifier.
    pub project_id: String,
    /// Token introspection result.
    pub token_info: TokenInfo,
}
