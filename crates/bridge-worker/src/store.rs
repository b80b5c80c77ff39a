use crate::{Error, Result};
use bridge_proto::StoreMethod;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// File-backed namespaced key/value store.
///
/// Opened fresh by every worker; durability lives in the file, not the
/// process, which is what lets a per-call isolate present a persistent
/// store to the caller.
#[derive(Debug, Clone)]
pub struct KvStore {
    path: PathBuf,
}

impl KvStore {
    /// Open (or create the directory for) a namespaced store.
    pub fn open<P: AsRef<Path>>(root: P, namespace: &str) -> Result<Self> {
        validate_namespace(namespace)?;
        let root = root.as_ref();
        fs::create_dir_all(root)?;
        Ok(Self {
            path: root.join(format!("{}.json", namespace)),
        })
    }

    /// Read a value by key; missing keys read as null.
    pub fn get(&self, key: &str) -> Result<Value> {
        Ok(self.load()?.get(key).cloned().unwrap_or(Value::Null))
    }

    /// Write a value under a key.
    pub fn set(&self, key: &str, value: Value) -> Result<()> {
        let mut entries = self.load()?;
        entries.insert(key.to_string(), value);
        self.persist(&entries)
    }

    /// Remove a key, reporting whether it existed.
    pub fn delete(&self, key: &str) -> Result<bool> {
        let mut entries = self.load()?;
        let removed = entries.remove(key).is_some();
        if removed {
            self.persist(&entries)?;
        }
        Ok(removed)
    }

    /// All keys in the namespace, sorted.
    pub fn keys(&self) -> Result<Vec<String>> {
        Ok(self.load()?.keys().cloned().collect())
    }

    /// Apply a bridged store method with positional arguments.
    pub fn apply(&self, method: StoreMethod, args: &[Value]) -> Result<Value> {
        match method {
            StoreMethod::Get => self.get(&arg_str(args, 0)?),
            StoreMethod::Set => {
                let key = arg_str(args, 0)?;
                let value = args
                    .get(1)
                    .cloned()
                    .ok_or_else(|| Error::InvalidRequest("set requires a value".to_string()))?;
                self.set(&key, value)?;
                Ok(Value::Null)
            }
            StoreMethod::Delete => Ok(Value::Bool(self.delete(&arg_str(args, 0)?)?)),
            StoreMethod::Keys => Ok(Value::Array(
                self.keys()?.into_iter().map(Value::String).collect(),
            )),
        }
    }

    fn load(&self) -> Result<BTreeMap<String, Value>> {
        match fs::read(&self.path) {
            Ok(data) => Ok(serde_json::from_slice(&data)?),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(err) => Err(err.into()),
        }
    }

    fn persist(&self, entries: &BTreeMap<String, Value>) -> Result<()> {
        let parent = self
            .path
            .parent()
            .ok_or_else(|| Error::Store(format!("invalid store path: {}", self.path.display())))?;

        let mut temp = tempfile::Builder::new()
            .prefix(".tmp.kv-")
            .suffix(".json")
            .tempfile_in(parent)?;
        serde_json::to_writer(&mut temp, entries)?;
        temp.flush()?;
        temp.persist(&self.path)
            .map_err(|e| Error::Store(e.to_string()))?;
        Ok(())
    }
}

fn arg_str(args: &[Value], index: usize) -> Result<String> {
    args.get(index)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| Error::InvalidRequest(format!("argument {} must be a string", index)))
}

fn validate_namespace(namespace: &str) -> Result<()> {
    let valid = !namespace.is_empty()
        && namespace
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'));

    if valid {
        Ok(())
    } else {
        Err(Error::Store(format!("invalid namespace: {}", namespace)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_set_then_get_roundtrip() {
        let temp_dir = TempDir::new().unwrap();
        let store = KvStore::open(temp_dir.path(), "props").unwrap();

        store.set("greeting", json!("hello")).unwrap();
        assert_eq!(store.get("greeting").unwrap(), json!("hello"));
    }

    #[test]
    fn test_missing_key_reads_null() {
        let temp_dir = TempDir::new().unwrap();
        let store = KvStore::open(temp_dir.path(), "props").unwrap();
        assert_eq!(store.get("absent").unwrap(), Value::Null);
    }

    #[test]
    fn test_get_is_deterministic() {
        let temp_dir = TempDir::new().unwrap();
        let store = KvStore::open(temp_dir.path(), "props").unwrap();
        store.set("k", json!({"n": 1})).unwrap();

        // two reads with no writes in between are structurally equal
        let first = store.get("k").unwrap();
        let second = store.get("k").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_delete_reports_presence() {
        let temp_dir = TempDir::new().unwrap();
        let store = KvStore::open(temp_dir.path(), "props").unwrap();
        store.set("k", json!(1)).unwrap();

        assert!(store.delete("k").unwrap());
        assert!(!store.delete("k").unwrap());
    }

    #[test]
    fn test_keys_sorted() {
        let temp_dir = TempDir::new().unwrap();
        let store = KvStore::open(temp_dir.path(), "props").unwrap();
        store.set("b", json!(2)).unwrap();
        store.set("a", json!(1)).unwrap();

        assert_eq!(store.keys().unwrap(), vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_namespaces_are_isolated() {
        let temp_dir = TempDir::new().unwrap();
        let first = KvStore::open(temp_dir.path(), "one").unwrap();
        let second = KvStore::open(temp_dir.path(), "two").unwrap();

        first.set("k", json!("one")).unwrap();
        assert_eq!(second.get("k").unwrap(), Value::Null);
    }

    #[test]
    fn test_invalid_namespace_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let err = KvStore::open(temp_dir.path(), "../escape").unwrap_err();
        assert!(matches!(err, Error::Store(_)));
    }

    #[test]
    fn test_apply_set_and_keys() {
        let temp_dir = TempDir::new().unwrap();
        let store = KvStore::open(temp_dir.path(), "props").unwrap();

        store
            .apply(StoreMethod::Set, &[json!("k"), json!("v")])
            .unwrap();
        let keys = store.apply(StoreMethod::Keys, &[]).unwrap();
        assert_eq!(keys, json!(["k"]));
    }
}
