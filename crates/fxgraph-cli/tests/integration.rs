//! Integration tests for fxgraph-cli.
//!
//! Tests cover the CLI binary invocation end to end: editing, validation,
//! compilation, bank encoding and preset storage.

use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

/// Helper to get the path to the `fxgraph` binary built by cargo.
///
/// Every invocation gets a private state directory and a missing settings
/// file so the user's own configuration never leaks in.
fn fxgraph_bin(dir: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_fxgraph"));
    cmd.arg("--settings")
        .arg(dir.join("settings.toml"))
        .arg("--state-dir")
        .arg(dir.join("state"));
    cmd
}

fn run(dir: &Path, args: &[&str]) -> Output {
    fxgraph_bin(dir)
        .args(args)
        .output()
        .expect("failed to run fxgraph")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

/// Writes a chain input -> distortion -> output and returns its path.
fn write_chain(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("chain.json");
    let output = run(
        dir,
        &[
            "edit",
            "--output",
            path.to_str().unwrap(),
            "add:distortion",
            "disconnect:input:output",
            "connect:input:fx-1",
            "connect:fx-1:output",
            "set:fx-1:drive:100",
            "set:fx-1:mix:50",
        ],
    );
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    path
}

// ---------------------------------------------------------------------------
// schema
// ---------------------------------------------------------------------------

#[test]
fn cli_schema_lists_all_kinds() {
    let dir = TempDir::new().unwrap();
    let output = run(dir.path(), &["schema"]);
    assert!(output.status.success());
    let text = stdout(&output);
    for kind in ["chorus", "compressor", "delay", "distortion", "eq", "filter", "reverb"] {
        assert!(text.contains(kind), "schema should list '{kind}'");
    }
}

#[test]
fn cli_schema_single_kind() {
    let dir = TempDir::new().unwrap();
    let output = run(dir.path(), &["schema", "filter"]);
    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("cutoff"));
    assert!(text.contains("2500 Hz"));
    assert!(text.contains("log"));

    assert!(!run(dir.path(), &["schema", "flanger"]).status.success());
}

// ---------------------------------------------------------------------------
// edit
// ---------------------------------------------------------------------------

#[test]
fn cli_edit_prints_canonical_payload() {
    let dir = TempDir::new().unwrap();
    let output = run(
        dir.path(),
        &["edit", "--compact", "add:delay", "connect:input:fx-1", "undo", "redo"],
    );
    assert!(output.status.success());

    let payload: serde_json::Value = serde_json::from_str(stdout(&output).trim()).unwrap();
    assert_eq!(payload["schemaVersion"], 1);
    assert_eq!(payload["nodes"][0]["id"], "fx-1");
    assert_eq!(payload["nodes"][0]["kind"], "delay");
    assert_eq!(payload["edges"].as_array().map(Vec::len), Some(2));
}

#[test]
fn cli_edit_rejection_warns_or_fails() {
    let dir = TempDir::new().unwrap();
    let lenient = run(dir.path(), &["edit", "connect:output:input"]);
    assert!(lenient.status.success());
    assert!(String::from_utf8_lossy(&lenient.stderr).contains("ERR_CYCLE_DETECTED"));

    let strict = run(dir.path(), &["edit", "--strict", "connect:output:input"]);
    assert!(!strict.status.success());
}

#[test]
fn cli_edit_continues_from_file() {
    let dir = TempDir::new().unwrap();
    let chain = write_chain(dir.path());
    let output = run(
        dir.path(),
        &["edit", "--compact", "--input", chain.to_str().unwrap(), "add:reverb"],
    );
    assert!(output.status.success());
    let payload: serde_json::Value = serde_json::from_str(stdout(&output).trim()).unwrap();
    assert_eq!(payload["nodes"][1]["id"], "fx-2");
}

// ---------------------------------------------------------------------------
// validate / compile / bank
// ---------------------------------------------------------------------------

#[test]
fn cli_validate_accepts_and_rejects() {
    let dir = TempDir::new().unwrap();
    let chain = write_chain(dir.path());
    let ok = run(dir.path(), &["validate", chain.to_str().unwrap()]);
    assert!(ok.status.success());
    assert!(stdout(&ok).contains("3 nodes, 2 edges"));

    let bad = dir.path().join("bad.json");
    std::fs::write(&bad, r#"{"schemaVersion":2,"nodes":[],"edges":[]}"#).unwrap();
    let rejected = run(dir.path(), &["validate", bad.to_str().unwrap()]);
    assert!(!rejected.status.success());
    assert!(String::from_utf8_lossy(&rejected.stderr).contains("unsupported schema version"));
}

#[test]
fn cli_compile_outputs_runtime_graph() {
    let dir = TempDir::new().unwrap();
    let chain = write_chain(dir.path());
    let output = run(dir.path(), &["compile", chain.to_str().unwrap()]);
    assert!(output.status.success());

    let runtime: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(runtime["hasOutputPath"], true);
    assert_eq!(runtime["nodes"][0]["effectType"], 4);
    assert_eq!(runtime["nodes"][0]["p1"], 1.0);
    assert_eq!(runtime["nodes"][0]["p5"], 0.5);
}

#[test]
fn cli_bank_prints_every_write() {
    let dir = TempDir::new().unwrap();
    let chain = write_chain(dir.path());
    let output = run(dir.path(), &["bank", chain.to_str().unwrap(), "--revision", "9"]);
    assert!(output.status.success());

    let text = stdout(&output);
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 309);
    assert_eq!(lines[0].split_whitespace().collect::<Vec<_>>(), ["6", "1"]);
    assert_eq!(lines[308].split_whitespace().collect::<Vec<_>>(), ["314", "9"]);
}

// ---------------------------------------------------------------------------
// presets
// ---------------------------------------------------------------------------

#[test]
fn cli_presets_save_list_show_delete() {
    let dir = TempDir::new().unwrap();
    let chain = write_chain(dir.path());

    let saved = run(dir.path(), &["presets", "save", "Fuzz", "--input", chain.to_str().unwrap()]);
    assert!(saved.status.success(), "{}", String::from_utf8_lossy(&saved.stderr));
    assert!(dir.path().join("state").join("fxgraph_presets_v1.json").is_file());

    let listed = stdout(&run(dir.path(), &["presets", "list"]));
    assert!(listed.contains("crunch"));
    assert!(listed.contains("Fuzz"));
    assert!(listed.contains("1 effects, 2 edges"));

    let shown = stdout(&run(dir.path(), &["presets", "show", "Fuzz"]));
    assert!(shown.contains("Distortion"));
    assert!(shown.contains("drive"));
    assert!(shown.contains("100%"));

    assert!(run(dir.path(), &["presets", "delete", "Fuzz"]).status.success());
    assert!(!run(dir.path(), &["presets", "delete", "Fuzz"]).status.success());
    assert!(!run(dir.path(), &["presets", "show", "Fuzz"]).status.success());
}

#[test]
fn cli_presets_factory_payload_validates() {
    let dir = TempDir::new().unwrap();
    let output = run(dir.path(), &["presets", "factory", "ambient"]);
    assert!(output.status.success());

    let path = dir.path().join("ambient.json");
    std::fs::write(&path, stdout(&output)).unwrap();
    assert!(run(dir.path(), &["validate", path.to_str().unwrap()]).status.success());

    let copied = run(dir.path(), &["presets", "save", "Mine", "--factory", "ambient"]);
    assert!(copied.status.success());
    let shown = stdout(&run(dir.path(), &["presets", "show", "Mine", "--json"]));
    assert!(shown.contains("\"reverb\""));
}
