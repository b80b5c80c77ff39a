use crate::{BridgeError, Result};
use bridge_proto::{
    boundary, WorkerError, WorkerErrorCode, WorkerOp, WorkerRequest, WorkerResponse,
    WORKER_PROTOCOL_VERSION,
};
use serde_json::Value;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::atomic::{AtomicU64, Ordering};

static REQUEST_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Runs one operation per freshly spawned worker process, blocking the
/// calling thread until the worker terminates.
///
/// The runner is stateless between calls and never pools or reuses workers:
/// per-call isolation is the mechanism by which "fresh subprocess, no
/// inherited context" semantics are guaranteed. This trades per-call latency
/// for isolation and is the dominant cost of the bridge.
#[derive(Debug, Clone)]
pub struct WorkerRunner {
    worker_bin: PathBuf,
    extra_env: Vec<(String, String)>,
}

impl WorkerRunner {
    /// Create a runner, resolving the worker binary from `BRIDGE_WORKER_BIN`
    /// or a `bridge-worker` sibling of the current executable.
    pub fn new() -> Result<Self> {
        Ok(Self {
            worker_bin: default_worker_bin()?,
            extra_env: Vec::new(),
        })
    }

    /// Create a runner for an explicit worker binary.
    pub fn with_worker_bin(worker_bin: impl Into<PathBuf>) -> Self {
        Self {
            worker_bin: worker_bin.into(),
            extra_env: Vec::new(),
        }
    }

    /// Add an environment variable passed to every spawned worker.
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra_env.push((key.into(), value.into()));
        self
    }

    /// Path to the worker binary.
    pub fn worker_bin(&self) -> &Path {
        &self.worker_bin
    }

    /// Execute one operation in a fresh worker process and block until the
    /// full result is available.
    ///
    /// Exactly one of ok-result or typed error is produced per call; an
    /// absent result is itself a failure. No partial or streaming return.
    pub fn run(&self, op: WorkerOp) -> Result<Value> {
        let request = WorkerRequest {
            version: WORKER_PROTOCOL_VERSION.to_string(),
            request_id: next_request_id(),
            op,
        };

        let encoded = serde_json::to_value(&request)?;
        boundary::check_value(&encoded)
            .map_err(|e| BridgeError::Serialization(e.to_string()))?;

        let mut command = Command::new(&self.worker_bin);
        command
            .arg("exec")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        self.apply_env_policy(&mut command);

        let mut child = command.spawn().map_err(BridgeError::Spawn)?;

        {
            let mut stdin = child
                .stdin
                .take()
                .ok_or_else(|| BridgeError::Worker("stdin unavailable".to_string()))?;
            let request_bytes = serde_json::to_vec(&request)?;
            stdin.write_all(&request_bytes)?;
            stdin.write_all(b"\n")?;
        }

        let output = child.wait_with_output()?;

        let response =
            match self.parse_response(&request.request_id, &output.stdout, &output.stderr) {
                Ok(response) => response,
                Err(_) if !output.status.success() => {
                    return Err(BridgeError::Worker(format!(
                        "worker exited with status {}: {}",
                        output.status,
                        String::from_utf8_lossy(&output.stderr).trim()
                    )));
                }
                Err(err) => return Err(err),
            };

        if !response.ok {
            let error = response.error.unwrap_or_else(|| {
                WorkerError::new(
                    WorkerErrorCode::WorkerFailure,
                    "worker failed without error payload",
                )
            });
            return Err(BridgeError::from_wire(error));
        }

        if !output.status.success() {
            return Err(BridgeError::Worker(format!(
                "worker exited with status {}",
                output.status
            )));
        }

        let result = response.result.unwrap_or(Value::Null);
        boundary::check_value(&result)
            .map_err(|e| BridgeError::Serialization(e.to_string()))?;
        Ok(result)
    }

    /// The worker starts from a clean environment: a small baseline plus the
    /// explicit `BRIDGE_`-prefixed configuration.
    fn apply_env_policy(&self, command: &mut Command) {
        command.env_clear();

        for key in ["PATH", "LANG", "LC_ALL", "HOME", "USER"] {
            if let Ok(value) = std::env::var(key) {
                command.env(key, value);
            }
        }

        for (key, value) in std::env::vars() {
            if key.starts_with("BRIDGE_") {
                command.env(key, value);
            }
        }

        for (key, value) in &self.extra_env {
            command.env(key, value);
        }

        command.env("BRIDGE_PROTOCOL", WORKER_PROTOCOL_VERSION);
    }

    fn parse_response(
        &self,
        request_id: &str,
        stdout: &[u8],
        stderr: &[u8],
    ) -> Result<WorkerResponse> {
        let parsed = serde_json::from_slice::<WorkerResponse>(stdout).or_else(|err| {
            if stderr.is_empty() {
                Err(err)
            } else {
                serde_json::from_slice::<WorkerResponse>(stderr)
            }
        });

        match parsed {
            Ok(response) => {
                if response.request_id != request_id {
                    return Err(BridgeError::Protocol("request_id mismatch".to_string()));
                }

                if response.version != WORKER_PROTOCOL_VERSION {
                    return Err(BridgeError::Protocol(
                        "protocol version mismatch".to_string(),
                    ));
                }

                Ok(response)
            }
            Err(err) => Err(BridgeError::Protocol(format!(
                "unparseable worker output: {}",
                err
            ))),
        }
    }
}

fn next_request_id() -> String {
    let seq = REQUEST_COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("worker-{}", seq)
}

fn default_worker_bin() -> Result<PathBuf> {
    if let Ok(bin) = std::env::var("BRIDGE_WORKER_BIN") {
        return Ok(PathBuf::from(bin));
    }

    let exe = std::env::current_exe()?;
    let sibling = exe
        .parent()
        .map(|dir| dir.join("bridge-worker"))
        .filter(|path| path.exists());

    sibling.ok_or_else(|| {
        BridgeError::Config(
            "worker binary not found: set BRIDGE_WORKER_BIN or configure [worker] bin".to_string(),
        )
    })
}
