use crate::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Declarative manifest naming the scopes a script requires.
///
/// Mirrors the emulated host's project manifest: a JSON file whose
/// `oauthScopes` list defaults to empty when absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScopesManifest {
    /// Permission scopes the script declares.
    #[serde(default, rename = "oauthScopes")]
    pub oauth_scopes: Vec<String>,
    /// Declared time zone.
    #[serde(default, rename = "timeZone")]
    pub time_zone: Option<String>,
    /// Declared runtime version.
    #[serde(default, rename = "runtimeVersion")]
    pub runtime_version: Option<String>,
}

impl ScopesManifest {
    /// Parse a manifest from JSON bytes.
    pub fn from_json(data: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(data)?)
    }

    /// Load a manifest from a file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = std::fs::read(path)?;
        Self::from_json(&data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scopes_parsed() {
        let manifest = ScopesManifest::from_json(
            br#"{"timeZone": "Etc/UTC", "oauthScopes": ["scope.read", "scope.write"]}"#,
        )
        .unwrap();
        assert_eq!(manifest.oauth_scopes, vec!["scope.read", "scope.write"]);
        assert_eq!(manifest.time_zone.as_deref(), Some("Etc/UTC"));
    }

    #[test]
    fn test_missing_scopes_default_empty() {
        let manifest = ScopesManifest::from_json(br#"{"timeZone": "Etc/UTC"}"#).unwrap();
        assert!(manifest.oauth_scopes.is_empty());
    }

    #[test]
    fn test_load_from_file() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("manifest.json");
        std::fs::write(&path, br#"{"oauthScopes": ["scope.read"]}"#).unwrap();

        let manifest = ScopesManifest::load(&path).unwrap();
        assert_eq!(manifest.oauth_scopes, vec!["scope.read"]);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = ScopesManifest::load("/nonexistent/manifest.json").unwrap_err();
        assert!(matches!(err, crate::Error::Io(_)));
    }
}
