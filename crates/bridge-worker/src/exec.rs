use crate::auth::TokenProvider;
use crate::store::KvStore;
use crate::{api, fetch, media, Result};
use bridge_proto::{
    boundary, ScopesManifest, WorkerError, WorkerErrorCode, WorkerOp, WorkerRequest,
    WorkerResponse, WORKER_PROTOCOL_VERSION,
};
use serde_json::Value;

/// Execute one request and produce exactly one response.
///
/// Every failure path ends in an error payload; a request never terminates
/// with neither result nor error.
pub async fn execute(request: WorkerRequest) -> WorkerResponse {
    match run_op(request.op).await {
        Ok(result) => {
            if let Err(err) = boundary::check_value(&result) {
                return failure(
                    &request.request_id,
                    WorkerError::new(WorkerErrorCode::SerializationError, err.to_string()),
                );
            }

            WorkerResponse {
                version: WORKER_PROTOCOL_VERSION.to_string(),
                request_id: request.request_id,
                ok: true,
                result: Some(result),
                error: None,
            }
        }
        Err(err) => failure(&request.request_id, err.to_wire()),
    }
}

/// Build a failure response for a request id.
pub fn failure(request_id: &str, error: WorkerError) -> WorkerResponse {
    WorkerResponse {
        version: WORKER_PROTOCOL_VERSION.to_string(),
        request_id: request_id.to_string(),
        ok: false,
        result: None,
        error: Some(error),
    }
}

async fn run_op(op: WorkerOp) -> Result<Value> {
    match op {
        WorkerOp::Init { manifest_path } => {
            tracing::info!(manifest = %manifest_path, "using manifest file");
            let manifest = ScopesManifest::load(&manifest_path)?;
            let provider = TokenProvider::from_env()?;
            let snapshot = provider.snapshot(manifest.oauth_scopes).await?;
            Ok(serde_json::to_value(snapshot)?)
        }
        WorkerOp::EnsureAuth { scopes } => {
            let provider = TokenProvider::from_env()?;
            let snapshot = provider.snapshot(scopes).await?;
            Ok(serde_json::to_value(snapshot)?)
        }
        WorkerOp::ApiInvoke {
            surface,
            prop,
            method,
            params,
            scopes,
        } => {
            let provider = TokenProvider::from_env()?;
            let reply = api::invoke(&provider, &surface, &prop, &method, &params, scopes).await?;
            Ok(serde_json::to_value(reply)?)
        }
        WorkerOp::FetchMedia {
            surface,
            resource_id,
            scopes,
        } => {
            let provider = TokenProvider::from_env()?;
            let reply = media::fetch_media(&provider, &surface, &resource_id, scopes).await?;
            Ok(serde_json::to_value(reply)?)
        }
        WorkerOp::HttpFetch {
            url,
            options,
            response_fields,
        } => {
            let client = reqwest::Client::new();
            fetch::fetch(&client, &url, &options, &response_fields).await
        }
        WorkerOp::Store {
            root,
            namespace,
            method,
            args,
        } => {
            let store = KvStore::open(&root, &namespace)?;
            store.apply(method, &args)
        }
    }
}
