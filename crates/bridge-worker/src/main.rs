//! bridge-worker: per-call isolate executing one bridged operation.
//!
//! Reads a single JSON request line on stdin and writes a single JSON
//! response line on stdout. Stdout belongs to the protocol; all diagnostics
//! go to stderr.

use anyhow::Context;
use bridge_proto::{WorkerError, WorkerErrorCode, WorkerRequest, WorkerResponse, WORKER_PROTOCOL_VERSION};
use std::io::{Read, Write};

fn main() -> anyhow::Result<()> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();

    let mut input = String::new();
    std::io::stdin()
        .read_to_string(&mut input)
        .context("reading request from stdin")?;

    let response = match serde_json::from_str::<WorkerRequest>(input.trim()) {
        Ok(request) => {
            let runtime = tokio::runtime::Runtime::new().context("starting worker runtime")?;
            runtime.block_on(bridge_worker::execute(request))
        }
        Err(err) => WorkerResponse {
            version: WORKER_PROTOCOL_VERSION.to_string(),
            request_id: String::new(),
            ok: false,
            result: None,
            error: Some(WorkerError::new(
                WorkerErrorCode::InvalidRequest,
                err.to_string(),
            )),
        },
    };

    let mut stdout = std::io::stdout().lock();
    serde_json::to_writer(&mut stdout, &response).context("writing response")?;
    stdout.write_all(b"\n")?;
    Ok(())
}
