use crate::{BridgeError, Result};
use bridge_proto::SurfaceSpec;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// The `[worker]` section of the bridge config.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WorkerConfig {
    /// Explicit path to the worker binary.
    #[serde(default)]
    pub bin: Option<PathBuf>,
}

/// The `[auth]` section of the bridge config.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Token endpoint for client-credentials grants.
    pub token_url: String,
    /// Token introspection endpoint.
    pub tokeninfo_url: String,
    /// Client identifier.
    pub client_id: String,
    /// Client secret; never logged, exposed only into worker environments.
    #[serde(default)]
    pub client_secret: Option<SecretString>,
    /// Project identifier, when not derivable from introspection.
    #[serde(default)]
    pub project_id: Option<String>,
}

/// Bridge configuration, loaded from `bridge.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct BridgeConfig {
    /// Worker process settings.
    #[serde(default)]
    pub worker: WorkerConfig,
    /// Authentication settings.
    pub auth: AuthConfig,
    /// Known API surfaces.
    #[serde(default = "default_surfaces")]
    pub surfaces: Vec<SurfaceSpec>,
}

impl BridgeConfig {
    /// Load the configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        toml::from_str(&text).map_err(|e| BridgeError::Config(e.to_string()))
    }

    /// Find a surface by name.
    pub fn surface(&self, name: &str) -> Option<&SurfaceSpec> {
        self.surfaces.iter().find(|s| s.name == name)
    }

    /// Environment variables handed to every worker process.
    ///
    /// This is the only channel through which workers receive configuration;
    /// they inherit nothing else from the caller.
    pub fn worker_env(&self) -> Vec<(String, String)> {
        let mut env = vec![
            ("BRIDGE_TOKEN_URL".to_string(), self.auth.token_url.clone()),
            (
                "BRIDGE_TOKENINFO_URL".to_string(),
                self.auth.tokeninfo_url.clone(),
            ),
            ("BRIDGE_CLIENT_ID".to_string(), self.auth.client_id.clone()),
        ];

        if let Some(secret) = &self.auth.client_secret {
            env.push((
                "BRIDGE_CLIENT_SECRET".to_string(),
                secret.expose_secret().clone(),
            ));
        }

        if let Some(project_id) = &self.auth.project_id {
            env.push(("BRIDGE_PROJECT_ID".to_string(), project_id.clone()));
        }

        env
    }
}

/// Surfaces available without any `[[surfaces]]` entries in the config.
pub fn default_surfaces() -> Vec<SurfaceSpec> {
    vec![
        SurfaceSpec {
            name: "storage".to_string(),
            base_url: "https://www.googleapis.com/drive/v3".to_string(),
            scopes: vec!["https://www.googleapis.com/auth/drive".to_string()],
            media_path: Some("files/{id}".to_string()),
        },
        SurfaceSpec {
            name: "sheets".to_string(),
            base_url: "https://sheets.googleapis.com/v4".to_string(),
            scopes: vec!["https://www.googleapis.com/auth/spreadsheets".to_string()],
            media_path: None,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_config_gets_default_surfaces() {
        let config: BridgeConfig = toml::from_str(
            r#"
[auth]
token_url = "https://auth.local/token"
tokeninfo_url = "https://auth.local/tokeninfo"
client_id = "client-1"
"#,
        )
        .unwrap();

        assert!(config.surface("storage").is_some());
        assert!(config.surface("sheets").is_some());
        assert!(config.surface("unknown").is_none());
    }

    #[test]
    fn test_explicit_surfaces_replace_defaults() {
        let config: BridgeConfig = toml::from_str(
            r#"
[auth]
token_url = "https://auth.local/token"
tokeninfo_url = "https://auth.local/tokeninfo"
client_id = "client-1"

[[surfaces]]
name = "blobs"
base_url = "https://blobs.local/v1"
scopes = ["blob.read"]
"#,
        )
        .unwrap();

        assert!(config.surface("storage").is_none());
        let blobs = config.surface("blobs").unwrap();
        assert_eq!(blobs.scopes, vec!["blob.read"]);
    }

    #[test]
    fn test_worker_env_includes_secret() {
        let config: BridgeConfig = toml::from_str(
            r#"
[auth]
token_url = "https://auth.local/token"
tokeninfo_url = "https://auth.local/tokeninfo"
client_id = "client-1"
client_secret = "hunter2"
project_id = "proj-1"
"#,
        )
        .unwrap();

        let env = config.worker_env();
        assert!(env.contains(&("BRIDGE_CLIENT_SECRET".to_string(), "hunter2".to_string())));
        assert!(env.contains(&("BRIDGE_PROJECT_ID".to_string(), "proj-1".to_string())));
    }
}
