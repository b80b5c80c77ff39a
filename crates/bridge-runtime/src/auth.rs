use bridge_proto::{AuthSnapshot, TokenInfo};
use std::collections::BTreeSet;

/// Monotonically growing union of permission scopes requested during the
/// process's lifetime.
///
/// Union-only, never shrinks: a worker authenticated for a superset of the
/// required scopes is always valid, so the accumulated set is what every
/// fresh worker must be authenticated against.
#[derive(Debug, Clone, Default)]
pub struct ScopeSet {
    scopes: BTreeSet<String>,
}

impl ScopeSet {
    /// Create an empty scope set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Union the required scopes into the set and return the full
    /// accumulated union, not just the newly added scopes.
    pub fn require<I, S>(&mut self, scopes: I) -> &BTreeSet<String>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for scope in scopes {
            self.scopes.insert(scope.into());
        }
        &self.scopes
    }

    /// The accumulated union as an ordered list.
    pub fn to_vec(&self) -> Vec<String> {
        self.scopes.iter().cloned().collect()
    }

    /// Whether a scope has been required.
    pub fn contains(&self, scope: &str) -> bool {
        self.scopes.contains(scope)
    }

    /// Number of accumulated scopes.
    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    /// Whether no scopes have been required yet.
    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }
}

/// Caller-side authentication session state.
///
/// Created empty at session start. Mutated only by scope accumulation and by
/// applying a successful worker snapshot; a failed refresh leaves the prior
/// state untouched.
#[derive(Debug, Clone, Default)]
pub struct AuthState {
    scopes: ScopeSet,
    access_token: Option<String>,
    token_info: Option<TokenInfo>,
    project_id: Option<String>,
}

impl AuthState {
    /// Create an empty auth state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Union the required scopes and return the full accumulated list.
    pub fn require<I, S>(&mut self, scopes: I) -> Vec<String>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.scopes.require(scopes);
        self.scopes.to_vec()
    }

    /// Replace token, introspection, and project id from a successful
    /// worker snapshot, unioning its scopes. All fields change together.
    pub fn apply(&mut self, snapshot: AuthSnapshot) {
        self.scopes.require(snapshot.scopes);
        self.access_token = Some(snapshot.access_token);
        self.token_info = Some(snapshot.token_info);
        self.project_id = Some(snapshot.project_id);
    }

    /// Clear all session state.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Seed the scope set without a worker round-trip.
    pub fn set_scopes<I, S>(&mut self, scopes: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.scopes.require(scopes);
    }

    /// Seed the access token.
    pub fn set_access_token(&mut self, token: impl Into<String>) {
        self.access_token = Some(token.into());
    }

    /// Seed the project identifier.
    pub fn set_project_id(&mut self, project_id: impl Into<String>) {
        self.project_id = Some(project_id.into());
    }

    /// Seed the token introspection result.
    pub fn set_token_info(&mut self, token_info: TokenInfo) {
        self.token_info = Some(token_info);
    }

    /// The accumulated scope set.
    pub fn scopes(&self) -> &ScopeSet {
        &self.scopes
    }

    /// The current access token, if authenticated.
    pub fn access_token(&self) -> Option<&str> {
        self.access_token.as_deref()
    }

    /// The current project identifier, if resolved.
    pub fn project_id(&self) -> Option<&str> {
        self.project_id.as_deref()
    }

    /// The current token introspection result, if any.
    pub fn token_info(&self) -> Option<&TokenInfo> {
        self.token_info.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_returns_full_union() {
        let mut scopes = ScopeSet::new();
        scopes.require(["scope.a"]);
        let union: Vec<_> = scopes.require(["scope.b"]).iter().cloned().collect();
        assert_eq!(union, vec!["scope.a".to_string(), "scope.b".to_string()]);
    }

    #[test]
    fn test_union_is_monotone() {
        let mut scopes = ScopeSet::new();
        scopes.require(["scope.a", "scope.b"]);
        scopes.require(["scope.b"]);
        assert_eq!(scopes.len(), 2);
        assert!(scopes.contains("scope.a"));
    }

    #[test]
    fn test_apply_replaces_all_fields() {
        let mut auth = AuthState::new();
        auth.require(["scope.a"]);
        auth.apply(AuthSnapshot {
            scopes: vec!["scope.b".to_string()],
            access_token: "tok-1".to_string(),
            project_id: "proj-1".to_string(),
            token_info: TokenInfo::default(),
        });

        assert_eq!(auth.access_token(), Some("tok-1"));
        assert_eq!(auth.project_id(), Some("proj-1"));
        assert!(auth.scopes().contains("scope.a"));
        assert!(auth.scopes().contains("scope.b"));
    }

    #[test]
    fn test_reset_clears_state() {
        let mut auth = AuthState::new();
        auth.set_access_token("tok");
        auth.require(["scope.a"]);
        auth.reset();
        assert!(auth.access_token().is_none());
        assert!(auth.scopes().is_empty());
    }
}
