use crate::{Error, Result};
use bridge_proto::{AuthSnapshot, TokenInfo};
use chrono::{Duration, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

/// Token grant returned by the token endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenGrant {
    /// Fresh access token.
    pub access_token: String,
    /// Seconds until expiry.
    #[serde(default)]
    pub expires_in: Option<i64>,
    /// Token type (typically "Bearer").
    #[serde(default)]
    pub token_type: Option<String>,
}

/// Resolves access tokens for a scope set from the worker's environment.
///
/// A worker inherits nothing from the caller's memory; everything here comes
/// from the `BRIDGE_` environment contract applied by the runner.
pub struct TokenProvider {
    token_url: String,
    tokeninfo_url: String,
    client_id: String,
    client_secret: Option<SecretString>,
    project_id: Option<String>,
    client: reqwest::Client,
}

impl TokenProvider {
    /// Build a provider from explicit endpoints and credentials.
    pub fn new(
        token_url: impl Into<String>,
        tokeninfo_url: impl Into<String>,
        client_id: impl Into<String>,
    ) -> Self {
        Self {
            token_url: token_url.into(),
            tokeninfo_url: tokeninfo_url.into(),
            client_id: client_id.into(),
            client_secret: None,
            project_id: None,
            client: reqwest::Client::new(),
        }
    }

    /// Set the client secret.
    pub fn with_client_secret(mut self, secret: SecretString) -> Self {
        self.client_secret = Some(secret);
        self
    }

    /// Set the project identifier.
    pub fn with_project_id(mut self, project_id: impl Into<String>) -> Self {
        self.project_id = Some(project_id.into());
        self
    }

    /// Build a provider from the worker environment.
    pub fn from_env() -> Result<Self> {
        let mut provider = Self::new(
            require_env("BRIDGE_TOKEN_URL")?,
            require_env("BRIDGE_TOKENINFO_URL")?,
            require_env("BRIDGE_CLIENT_ID")?,
        );
        provider.client_secret = std::env::var("BRIDGE_CLIENT_SECRET")
            .ok()
            .map(SecretString::new);
        provider.project_id = std::env::var("BRIDGE_PROJECT_ID").ok();
        Ok(provider)
    }

    /// The provider's HTTP client, shared with the surface dispatchers.
    pub fn http(&self) -> &reqwest::Client {
        &self.client
    }

    /// Obtain a fresh access token for the accumulated scope set.
    pub async fn token(&self, scopes: &[String]) -> Result<TokenGrant> {
        let form = [
            ("grant_type", "client_credentials".to_string()),
            ("scope", scopes.join(" ")),
        ];

        let mut request = self.client.post(&self.token_url).form(&form);
        request = match &self.client_secret {
            Some(secret) => request.basic_auth(&self.client_id, Some(secret.expose_secret())),
            None => request.basic_auth(&self.client_id, None::<&str>),
        };

        let response = request
            .send()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Auth(format!(
                "token endpoint returned {}: {}",
                status, body
            )));
        }

        Ok(response.json::<TokenGrant>().await?)
    }

    /// Introspect an access token.
    pub async fn token_info(&self, access_token: &str) -> Result<TokenInfo> {
        let response = self
            .client
            .get(&self.tokeninfo_url)
            .query(&[("access_token", access_token)])
            .send()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Auth(format!(
                "token introspection returned {}: {}",
                status, body
            )));
        }

        Ok(response.json::<TokenInfo>().await?)
    }

    /// Authenticate for the scope union and assemble the full snapshot the
    /// caller applies atomically.
    pub async fn snapshot(&self, scopes: Vec<String>) -> Result<AuthSnapshot> {
        let grant = self.token(&scopes).await?;
        let mut token_info = self.token_info(&grant.access_token).await?;

        if token_info.expires_at.is_none() {
            if let Some(seconds) = grant.expires_in.or(token_info.expires_in) {
                token_info.expires_at = Some(Utc::now() + Duration::seconds(seconds));
            }
        }

        let project_id = self
            .project_id
            .clone()
            .or_else(|| token_info.audience.clone())
            .ok_or_else(|| {
                Error::Auth("project id unresolved: set BRIDGE_PROJECT_ID".to_string())
            })?;

        tracing::debug!(
            scopes = scopes.len(),
            project_id = %project_id,
            "authenticated worker"
        );

        Ok(AuthSnapshot {
            scopes,
            access_token: grant.access_token,
            project_id,
            token_info,
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).map_err(|_| Error::Auth(format!("missing {} in worker environment", key)))
}
