//! Runs the `sketch` binary end to end.

use std::io::Write;
use std::process::{Command, Stdio};

use serde_json::Value;
use tempfile::TempDir;

fn sketch() -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_sketch"));
    command
        .env_remove("SKETCH_SEED")
        .env_remove("SKETCH_BACKGROUND")
        .env_remove("SKETCH_SOURCE")
        .env("RUST_LOG", "warn");
    command
}

#[test]
fn stdin_to_stdout() {
    let mut child = sketch()
        .args(["--seed", "7", "--background", "#f8f9fa"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .expect("spawn sketch");
    child
        .stdin
        .take()
        .expect("stdin")
        .write_all(b"```json\n[{\"type\": \"arrow\", \"width\": 5, \"height\": 300}]\n```")
        .expect("write stdin");
    let output = child.wait_with_output().expect("wait");
    assert!(output.status.success());

    let document: Value = serde_json::from_slice(&output.stdout).expect("document on stdout");
    assert_eq!(document["appState"]["viewBackgroundColor"], "#f8f9fa");
    assert_eq!(document["elements"][0]["type"], "line");
}

#[test]
fn file_to_file_with_env_seed() {
    let dir = TempDir::new().expect("temp dir");
    let input = dir.path().join("elements.json");
    std::fs::write(&input, r#"[{"type": "rectangle"}, {"type": "text", "text": "Hi"}]"#)
        .expect("write input");

    let mut ids = Vec::new();
    for name in ["a.excalidraw", "b.excalidraw"] {
        let output = dir.path().join(name);
        let status = sketch()
            .env("SKETCH_SEED", "99")
            .env("SKETCH_SOURCE", "sketch-test")
            .arg(&input)
            .arg("-o")
            .arg(&output)
            .status()
            .expect("run sketch");
        assert!(status.success());

        let text = std::fs::read_to_string(&output).expect("read output");
        let document: Value = serde_json::from_str(&text).expect("valid JSON");
        assert_eq!(document["source"], "sketch-test");
        ids.push(document["elements"][0]["id"].clone());
    }
    assert_eq!(ids[0], ids[1]);
}

#[test]
fn malformed_input_fails() {
    let dir = TempDir::new().expect("temp dir");
    let input = dir.path().join("bad.json");
    std::fs::write(&input, "42").expect("write input");

    let output = sketch().arg(&input).output().expect("run sketch");
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Malformed document"), "stderr: {stderr}");
}
