//! bridge-boot: seed a bridge session from a scopes manifest.
//!
//! Performs the one-time bootstrap round-trip: reads the declared scopes,
//! authenticates a worker for them, and validates the token via
//! introspection.
//!
//! # Usage
//!
//! ```bash
//! bridge-boot manifest.json --config bridge.toml
//! ```

use bridge_runtime::{BridgeConfig, BridgeSession};
use clap::Parser;
use env_logger::Env;
use log::{error, info};
use std::path::PathBuf;
use std::process;

/// Bootstrap a bridge session from a scopes manifest.
///
/// Reads the manifest's declared scopes, performs one worker round-trip to
/// authenticate for them, and prints the resulting session summary.
#[derive(Parser, Debug)]
#[command(name = "bridge-boot")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the scopes manifest file
    #[arg(value_name = "MANIFEST")]
    manifest: PathBuf,

    /// Path to the bridge configuration (default: bridge.toml)
    #[arg(short, long, default_value = "bridge.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level))
        .format_timestamp_millis()
        .init();

    if !args.manifest.exists() {
        error!("Manifest not found: {}", args.manifest.display());
        process::exit(1);
    }

    let config = match BridgeConfig::load(&args.config) {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to load config: {}", e);
            process::exit(1);
        }
    };

    let mut session = match BridgeSession::new(&config) {
        Ok(s) => s,
        Err(e) => {
            error!("Failed to build session: {}", e);
            process::exit(1);
        }
    };

    info!("Using manifest file: {}", args.manifest.display());
    let snapshot = match session.init(&args.manifest) {
        Ok(s) => s,
        Err(e) => {
            error!("Bootstrap failed: {}", e);
            process::exit(1);
        }
    };

    info!("Project: {}", snapshot.project_id);
    info!("Declared scopes: {}", snapshot.scopes.len());
    for scope in &snapshot.scopes {
        info!("  - {}", scope);
    }

    let granted = snapshot.token_info.scopes();
    info!("Token carries {} scope(s)", granted.len());
    if let Some(expires_in) = snapshot.token_info.expires_in {
        info!("Token expires in {}s", expires_in);
    }
}
