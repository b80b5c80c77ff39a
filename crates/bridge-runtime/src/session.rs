use crate::auth::AuthState;
use crate::config::BridgeConfig;
use crate::runner::WorkerRunner;
use crate::{BridgeError, Result};
use bridge_proto::{
    boundary, ApiReply, AuthSnapshot, FetchOptions, MediaReply, ResponseMeta, StoreMethod,
    SurfaceSpec, WorkerOp,
};
use serde_json::Value;
use std::path::Path;

/// A streamed resource fully materialized on the caller side.
#[derive(Debug, Clone)]
pub struct MediaPayload {
    /// Decoded bytes, absent when the fetch did not succeed.
    pub data: Option<Vec<u8>>,
    /// Response metadata projection.
    pub meta: ResponseMeta,
}

/// An explicit bridge context: auth state plus the worker runner.
///
/// The calling side is single-threaded and blocking by design; each bridged
/// call fully blocks until its worker terminates, so calls are strictly
/// sequential and no locking is needed around the auth state.
#[derive(Debug)]
pub struct BridgeSession {
    runner: WorkerRunner,
    auth: AuthState,
    surfaces: Vec<SurfaceSpec>,
}

impl BridgeSession {
    /// Build a session from configuration.
    pub fn new(config: &BridgeConfig) -> Result<Self> {
        let mut runner = match &config.worker.bin {
            Some(bin) => WorkerRunner::with_worker_bin(bin),
            None => WorkerRunner::new()?,
        };
        for (key, value) in config.worker_env() {
            runner = runner.env(key, value);
        }

        Ok(Self {
            runner,
            auth: AuthState::new(),
            surfaces: config.surfaces.clone(),
        })
    }

    /// Build a session around an explicit runner and surface table.
    pub fn with_runner(runner: WorkerRunner, surfaces: Vec<SurfaceSpec>) -> Self {
        Self {
            runner,
            auth: AuthState::new(),
            surfaces,
        }
    }

    /// One-time bootstrap: read the scopes manifest in a worker, establish
    /// auth for the declared scopes, and seed this session from the result.
    ///
    /// Idempotent in effect but not cheap: calling it twice performs the
    /// authentication round-trip twice.
    pub fn init<P: AsRef<Path>>(&mut self, manifest_path: P) -> Result<AuthSnapshot> {
        let op = WorkerOp::Init {
            manifest_path: manifest_path.as_ref().to_string_lossy().to_string(),
        };
        let snapshot: AuthSnapshot = serde_json::from_value(self.runner.run(op)?)?;
        self.auth.apply(snapshot.clone());
        Ok(snapshot)
    }

    /// Union the required scopes and re-authenticate a fresh worker against
    /// the full accumulated set.
    pub fn ensure<I, S>(&mut self, scopes: I) -> Result<AuthSnapshot>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let op = self.ensure_op(scopes);
        let snapshot: AuthSnapshot = serde_json::from_value(self.runner.run(op)?)?;
        self.auth.apply(snapshot.clone());
        Ok(snapshot)
    }

    /// Invoke a named method on a named API surface inside a worker.
    pub fn invoke(&mut self, surface: &str, prop: &str, method: &str, params: Value) -> Result<ApiReply> {
        let op = self.api_op(surface, prop, method, params)?;
        Ok(serde_json::from_value(self.runner.run(op)?)?)
    }

    /// Fetch a streamed binary resource, buffered to bytes inside the worker.
    pub fn fetch_media(&mut self, surface: &str, resource_id: &str) -> Result<MediaPayload> {
        let op = self.media_op(surface, resource_id)?;
        let reply: MediaReply = serde_json::from_value(self.runner.run(op)?)?;

        let data = match reply.data {
            Some(encoded) => Some(
                boundary::decode_bytes_base64(&encoded)
                    .map_err(|e| BridgeError::Serialization(e.to_string()))?,
            ),
            None => None,
        };

        Ok(MediaPayload {
            data,
            meta: reply.meta,
        })
    }

    /// Perform a generic HTTP fetch, returning only the requested response
    /// fields.
    pub fn fetch(
        &mut self,
        url: &str,
        options: FetchOptions,
        response_fields: &[&str],
    ) -> Result<Value> {
        let op = WorkerOp::HttpFetch {
            url: url.to_string(),
            options,
            response_fields: response_fields.iter().map(|f| f.to_string()).collect(),
        };
        self.runner.run(op)
    }

    /// Run a key/value store operation inside a worker.
    pub fn store(
        &mut self,
        root: &str,
        namespace: &str,
        method: StoreMethod,
        args: Vec<Value>,
    ) -> Result<Value> {
        let op = WorkerOp::Store {
            root: root.to_string(),
            namespace: namespace.to_string(),
            method,
            args,
        };
        self.runner.run(op)
    }

    /// Clear all auth state.
    pub fn reset(&mut self) {
        self.auth.reset();
    }

    /// The session's auth state.
    pub fn auth(&self) -> &AuthState {
        &self.auth
    }

    /// Mutable access for bootstrap seeding.
    pub fn auth_mut(&mut self) -> &mut AuthState {
        &mut self.auth
    }

    fn surface_spec(&self, name: &str) -> Result<SurfaceSpec> {
        self.surfaces
            .iter()
            .find(|s| s.name == name)
            .cloned()
            .ok_or_else(|| BridgeError::Config(format!("unknown api surface: {}", name)))
    }

    fn ensure_op<I, S>(&mut self, scopes: I) -> WorkerOp
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        WorkerOp::EnsureAuth {
            scopes: self.auth.require(scopes),
        }
    }

    fn api_op(&mut self, surface: &str, prop: &str, method: &str, params: Value) -> Result<WorkerOp> {
        let spec = self.surface_spec(surface)?;
        let scopes = self.auth.require(spec.scopes.iter().cloned());
        Ok(WorkerOp::ApiInvoke {
            surface: spec,
            prop: prop.to_string(),
            method: method.to_string(),
            params,
            scopes,
        })
    }

    fn media_op(&mut self, surface: &str, resource_id: &str) -> Result<WorkerOp> {
        let spec = self.surface_spec(surface)?;
        let scopes = self.auth.require(spec.scopes.iter().cloned());
        Ok(WorkerOp::FetchMedia {
            surface: spec,
            resource_id: resource_id.to_string(),
            scopes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::default_surfaces;

    fn test_session() -> BridgeSession {
        BridgeSession::with_runner(
            WorkerRunner::with_worker_bin("/nonexistent/bridge-worker"),
            default_surfaces(),
        )
    }

    #[test]
    fn test_second_call_carries_accumulated_scopes() {
        let mut session = test_session();

        let first = session.ensure_op(["scope.a"]);
        let WorkerOp::EnsureAuth { scopes } = first else {
            panic!("expected ensure op");
        };
        assert_eq!(scopes, vec!["scope.a".to_string()]);

        let second = session.ensure_op(["scope.b"]);
        let WorkerOp::EnsureAuth { scopes } = second else {
            panic!("expected ensure op");
        };
        assert_eq!(scopes, vec!["scope.a".to_string(), "scope.b".to_string()]);
    }

    #[test]
    fn test_api_op_unions_surface_scopes() {
        let mut session = test_session();
        session.auth_mut().set_scopes(["scope.custom"]);

        let op = session
            .api_op("storage", "files", "list", serde_json::json!({}))
            .unwrap();
        let WorkerOp::ApiInvoke { scopes, surface, .. } = op else {
            panic!("expected api op");
        };

        assert!(scopes.contains(&"scope.custom".to_string()));
        assert!(scopes.contains(&"https://www.googleapis.com/auth/drive".to_string()));
        assert_eq!(surface.name, "storage");
    }

    #[test]
    fn test_unknown_surface_is_config_error() {
        let mut session = test_session();
        let err = session
            .api_op("nope", "files", "list", serde_json::json!({}))
            .unwrap_err();
        assert!(matches!(err, BridgeError::Config(_)));
    }
}
