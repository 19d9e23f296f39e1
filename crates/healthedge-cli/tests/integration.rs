//! Integration tests for CLI commands.

use serde_json::{json, Value};
use std::io::Write;
use std::process::{Command, Stdio};
use tempfile::TempDir;

const ID: &str = "0b5c4f7e-2f1d-4b7e-9a53-8c7d2d1f6a10";

fn run_cli(args: &[&str]) -> (bool, String, String) {
    run_cli_with_stdin(args, None)
}

fn run_cli_with_stdin(args: &[&str], stdin: Option<&str>) -> (bool, String, String) {
    let mut child = Command::new(env!("CARGO_BIN_EXE_healthedge"))
        .args(args)
        .env_remove("RUST_LOG")
        .env_remove("HEALTHEDGE_LOG")
        .env_remove("HEALTHEDGE_LOG_JSON")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to execute CLI");

    {
        let mut pipe = child.stdin.take().unwrap();
        if let Some(text) = stdin {
            pipe.write_all(text.as_bytes()).unwrap();
        }
    }

    let output = child.wait_with_output().unwrap();
    let stdout = String::from_utf8(output.stdout).unwrap();
    let stderr = String::from_utf8(output.stderr).unwrap();
    (output.status.success(), stdout, stderr)
}

fn write_file(dir: &TempDir, name: &str, contents: &str) -> String {
    let path = dir.path().join(name);
    std::fs::write(&path, contents).unwrap();
    path.to_string_lossy().to_string()
}

fn create_event(priority: &str) -> Value {
    let (success, stdout, stderr) = run_cli(&[
        "create",
        "--classification",
        "MEASUREMENT",
        "--payload",
        r#"{"heart_rate":88,"spo2":97}"#,
        "--priority",
        priority,
        "--identifier",
        ID,
        "--timestamp",
        "2024-01-01T00:00:00Z",
    ]);
    assert!(success, "{stderr}");
    serde_json::from_str(stdout.trim()).unwrap()
}

#[test]
fn test_create_command() {
    let event = create_event("2");
    assert_eq!(event["identifier"], json!(ID));
    assert_eq!(event["classification"], json!("MEASUREMENT"));
    assert_eq!(event["priority"], json!(2));
    assert_eq!(event["payload"], json!({"heart_rate": 88, "spo2": 97}));
    assert_eq!(event["integrity_hash"].as_str().unwrap().len(), 64);

    // Same content, same hash.
    assert_eq!(create_event("2")["integrity_hash"], event["integrity_hash"]);
    assert_ne!(create_event("3")["integrity_hash"], event["integrity_hash"]);
}

#[test]
fn test_create_with_defaults() {
    let (success, stdout, _) = run_cli(&["create", "--classification", "alert"]);
    assert!(success);
    let event: Value = serde_json::from_str(stdout.trim()).unwrap();
    assert_eq!(event["classification"], json!("ALERT"));
    assert_eq!(event["priority"], json!(1));
    assert_eq!(event["payload"], json!({}));
}

#[test]
fn test_create_rejects_invalid_fields() {
    let (success, _, stderr) = run_cli(&[
        "create",
        "--classification",
        "MEASUREMENT",
        "--priority",
        "-1",
    ]);
    assert!(!success);
    assert!(stderr.contains("priority"));

    let (success, _, stderr) = run_cli(&[
        "create",
        "--classification",
        "MEASUREMENT",
        "--payload",
        "[1,2,3]",
    ]);
    assert!(!success);
    assert!(stderr.contains("payload"));

    let (success, _, stderr) = run_cli(&[
        "create",
        "--classification",
        "MEASUREMENT",
        "--timestamp",
        "2024-01-01T00:00:00",
    ]);
    assert!(!success);
    assert!(stderr.contains("timezone"));
}

#[test]
fn test_canonicalize_command() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "input.json", "{ \"b\": 1,\n  \"a\": {\"z\": true, \"y\": null} }");

    let (success, stdout, _) = run_cli(&["canonicalize", &path]);
    assert!(success);
    assert_eq!(stdout.trim_end(), r#"{"a":{"y":null,"z":true},"b":1}"#);
}

#[test]
fn test_canonicalize_from_stdin() {
    let (success, stdout, _) = run_cli_with_stdin(&["canonicalize"], Some(r#"{"b":2,"a":1}"#));
    assert!(success);
    assert_eq!(stdout.trim_end(), r#"{"a":1,"b":2}"#);
}

#[test]
fn test_digest_matches_event_hash() {
    let event = create_event("2");
    let content = json!({
        "identifier": event["identifier"],
        "classification": event["classification"],
        "timestamp": event["timestamp"],
        "priority": event["priority"],
        "payload": event["payload"],
    });

    let (success, stdout, _) = run_cli_with_stdin(&["digest"], Some(&content.to_string()));
    assert!(success);
    assert_eq!(stdout.trim(), event["integrity_hash"].as_str().unwrap());
}

#[test]
fn test_verify_command() {
    let dir = TempDir::new().unwrap();
    let intact = create_event("2");
    let mut tampered = intact.clone();
    tampered["payload"]["heart_rate"] = json!(150);

    let ok_path = write_file(&dir, "ok.json", &intact.to_string());
    let (success, stdout, _) = run_cli(&["verify", &ok_path, "--strict"]);
    assert!(success);
    assert!(stdout.contains("IDENTIFIER"));
    assert!(stdout.contains(" ok"));

    let mixed = format!("{}\n{}\n", intact, tampered);
    let mixed_path = write_file(&dir, "events.jsonl", &mixed);
    let (success, stdout, _) = run_cli(&["verify", &mixed_path, "--json"]);
    assert!(success);
    let report: Value = serde_json::from_str(stdout.trim()).unwrap();
    assert_eq!(report["total"], json!(2));
    assert_eq!(report["failed"], json!(1));
    assert_eq!(report["results"][0]["verdict"], json!("ok"));
    assert_eq!(report["results"][1]["verdict"], json!("mismatch"));

    let (success, _, stderr) = run_cli(&["verify", &mixed_path, "--strict"]);
    assert!(!success);
    assert!(stderr.contains("1 of 2 events failed verification"));
}

#[test]
fn test_verify_accepts_arrays_and_reports_invalid_events() {
    let dir = TempDir::new().unwrap();
    let events = json!([create_event("1"), {"identifier": "not-a-uuid"}]);
    let path = write_file(&dir, "events.json", &events.to_string());

    let (success, stdout, _) = run_cli(&["verify", &path, "--json"]);
    assert!(success);
    let report: Value = serde_json::from_str(stdout.trim()).unwrap();
    assert_eq!(report["results"][1]["verdict"], json!("invalid"));
    assert!(report["results"][1]["detail"]
        .as_str()
        .unwrap()
        .contains("not-a-uuid"));
}

#[test]
fn test_missing_file_reports_error() {
    let (success, _, stderr) = run_cli(&["canonicalize", "/nonexistent/healthedge.json"]);
    assert!(!success);
    assert!(stderr.starts_with("Error: Failed to read file"));
}
