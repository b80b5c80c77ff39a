#![cfg(unix)]

use bridge_runtime::{default_surfaces, BridgeSession, WorkerRunner};
use bridge_services::PropertyStore;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn write_worker(dir: &Path, result_json: &str) -> PathBuf {
    let path = dir.join("fake-worker");
    let body = format!(
        r#"#!/bin/sh
read -r line
id=$(printf '%s' "$line" | sed -n 's/.*"request_id":"\([^"]*\)".*/\1/p')
printf '{{"version":"bridge.v1","request_id":"%s","ok":true,"result":{},"error":null}}\n' "$id"
"#,
        result_json
    );
    fs::write(&path, body).unwrap();
    let mut perms = fs::metadata(&path).unwrap().permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&path, perms).unwrap();
    path
}

fn session_for(worker: PathBuf) -> BridgeSession {
    BridgeSession::with_runner(WorkerRunner::with_worker_bin(worker), default_surfaces())
}

#[test]
fn get_maps_string_value() {
    let temp_dir = TempDir::new().unwrap();
    let worker = write_worker(temp_dir.path(), r#""hello""#);

    let props = PropertyStore::new("/var/data/props", "script");
    let mut session = session_for(worker);

    assert_eq!(
        props.get(&mut session, "greeting").unwrap(),
        Some("hello".to_string())
    );
}

#[test]
fn get_maps_null_to_none() {
    let temp_dir = TempDir::new().unwrap();
    let worker = write_worker(temp_dir.path(), "null");

    let props = PropertyStore::new("/var/data/props", "script");
    let mut session = session_for(worker);

    assert_eq!(props.get(&mut session, "absent").unwrap(), None);
}

#[test]
fn keys_collects_strings() {
    let temp_dir = TempDir::new().unwrap();
    let worker = write_worker(temp_dir.path(), r#"["a","b"]"#);

    let props = PropertyStore::new("/var/data/props", "script");
    let mut session = session_for(worker);

    assert_eq!(
        props.keys(&mut session).unwrap(),
        vec!["a".to_string(), "b".to_string()]
    );
}

#[test]
fn delete_reports_presence() {
    let temp_dir = TempDir::new().unwrap();
    let worker = write_worker(temp_dir.path(), "true");

    let props = PropertyStore::new("/var/data/props", "script");
    let mut session = session_for(worker);

    assert!(props.delete(&mut session, "k").unwrap());
}
