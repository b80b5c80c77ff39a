use crate::Result;
use bridge_runtime::{BridgeSession, StoreMethod};
use serde_json::{json, Value};

/// Script-properties facade over the bridged key/value store.
///
/// Each call delegates to a fresh worker, which re-opens the file-backed
/// store; that is what lets an asynchronous, file-backed store behave as a
/// synchronous property service.
#[derive(Debug, Clone)]
pub struct PropertyStore {
    root: String,
    namespace: String,
}

impl PropertyStore {
    /// Create a facade for a store root and namespace.
    pub fn new(root: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            namespace: namespace.into(),
        }
    }

    /// Read a property.
    pub fn get(&self, session: &mut BridgeSession, key: &str) -> Result<Option<String>> {
        let value = session.store(
            &self.root,
            &self.namespace,
            StoreMethod::Get,
            vec![json!(key)],
        )?;

        Ok(match value {
            Value::Null => None,
            Value::String(text) => Some(text),
            other => Some(other.to_string()),
        })
    }

    /// Write a property.
    pub fn set(&self, session: &mut BridgeSession, key: &str, value: &str) -> Result<()> {
        session.store(
            &self.root,
            &self.namespace,
            StoreMethod::Set,
            vec![json!(key), json!(value)],
        )?;
        Ok(())
    }

    /// Delete a property, reporting whether it existed.
    pub fn delete(&self, session: &mut BridgeSession, key: &str) -> Result<bool> {
        let value = session.store(
            &self.root,
            &self.namespace,
            StoreMethod::Delete,
            vec![json!(key)],
        )?;
        Ok(value.as_bool().unwrap_or(false))
    }

    /// All property keys.
    pub fn keys(&self, session: &mut BridgeSession) -> Result<Vec<String>> {
        let value = session.store(&self.root, &self.namespace, StoreMethod::Keys, Vec::new())?;
        let keys = value
            .as_array()
            .map(|items| {
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();
        Ok(keys)
    }
}
