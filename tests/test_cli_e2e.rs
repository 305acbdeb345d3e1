mod common;

use common::{fixture_path, run_cli};
use serde_json::Value;

fn path(name: &str) -> String {
    fixture_path(name).to_string_lossy().into_owned()
}

fn stdout(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

// ============================================================================
// version / completions
// ============================================================================

#[test]
fn version_human() {
    let output = run_cli(&["version"]);
    assert!(output.status.success());
    assert!(stdout(&output).starts_with("rpc-certify "));
}

#[test]
fn version_json() {
    let output = run_cli(&["version", "--format", "json"]);
    assert!(output.status.success());
    let parsed: Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(parsed["name"], "rpc-certify");
    assert_eq!(parsed["version"], env!("CARGO_PKG_VERSION"));
}

#[test]
fn completions_bash() {
    let output = run_cli(&["completions", "bash"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("rpc-certify"));
}

#[test]
fn unknown_subcommand_is_usage_error() {
    let output = run_cli(&["frobnicate"]);
    assert_eq!(output.status.code(), Some(64));
    assert!(stderr(&output).contains("frobnicate"), "{}", stderr(&output));
}

#[test]
fn unknown_flag_is_usage_error() {
    let output = run_cli(&["validate", "--bogus", &path("eth.yaml")]);
    assert_eq!(output.status.code(), Some(64));
}

#[test]
fn help_exits_zero() {
    let output = run_cli(&["--help"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("Usage"));
}

// ============================================================================
// validate
// ============================================================================

#[test]
fn validate_valid_fixtures() {
    let output = run_cli(&["validate", &path("eth.yaml")]);
    assert!(output.status.success(), "{}", stderr(&output));
    assert!(stdout(&output).contains("4 fixture(s) ok"));
}

#[test]
fn validate_json_output() {
    let output = run_cli(&["validate", "--format", "json", &path("eth.yaml")]);
    assert!(output.status.success(), "{}", stderr(&output));
    let parsed: Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(parsed["valid"], true);
    assert_eq!(parsed["files"][0]["fixtures"], 4);
}

#[test]
fn validate_quiet_prints_nothing() {
    let output = run_cli(&["--quiet", "validate", &path("eth.yaml")]);
    assert!(output.status.success());
    assert!(stdout(&output).is_empty());
}

#[test]
fn validate_missing_field_exits_with_fixture_error() {
    let output = run_cli(&["validate", &path("missing_result.yaml")]);
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("response.result"), "{}", stderr(&output));
}

#[test]
fn validate_malformed_yaml_exits_with_fixture_error() {
    let output = run_cli(&["validate", &path("not_yaml.yaml")]);
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("parse error"), "{}", stderr(&output));
}

#[test]
fn validate_missing_file() {
    let output = run_cli(&["validate", "/tmp/nonexistent_rpc_certify_fixture.yaml"]);
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("file not found"));
}

// ============================================================================
// list
// ============================================================================

#[test]
fn list_all_cases() {
    let output = run_cli(&["list", "--fixtures", &path("eth.yaml")]);
    assert!(output.status.success(), "{}", stderr(&output));
    let text = stdout(&output);
    assert_eq!(text.lines().count(), 24);
    assert!(text.contains("eth_chainId/missing-method"));
}

#[test]
fn list_json_canonical_only() {
    let output = run_cli(&[
        "list",
        "--fixtures",
        &path("eth.yaml"),
        "--canonical-only",
        "--format",
        "json",
    ]);
    assert!(output.status.success(), "{}", stderr(&output));
    let rows: Vec<Value> = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(rows.len(), 4);
    assert_eq!(rows[0]["name"], "eth_chainId");
    assert_eq!(rows[0]["id"], 10);
    assert_eq!(rows[0]["request"]["jsonrpc"], "2.0");
    assert_eq!(rows[3]["id"], 13);
}

#[test]
fn list_single_strategy() {
    let output = run_cli(&[
        "list",
        "-f",
        &path("eth.yaml"),
        "--strategy",
        "wrong-content-type",
        "--format",
        "json",
    ]);
    assert!(output.status.success(), "{}", stderr(&output));
    let rows: Vec<Value> = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(rows.len(), 8);
    assert_eq!(rows[1]["strategy"], "wrong-content-type");
    assert_eq!(rows[1]["content_type"], "text/plain");
}

// ============================================================================
// run
// ============================================================================

#[test]
fn run_unknown_fixture_is_usage_error() {
    let output = run_cli(&[
        "run",
        "--fixtures",
        &path("eth.yaml"),
        "--only",
        "eth_chainID",
    ]);
    assert_eq!(output.status.code(), Some(64));
    assert!(stderr(&output).contains("did you mean 'eth_chainId'"), "{}", stderr(&output));
}

#[test]
fn run_invalid_fixtures_fails_before_sending() {
    let output = run_cli(&["run", "--fixtures", &path("missing_result.yaml")]);
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn run_without_server_is_transport_error() {
    // Only meaningful when nothing is bound to the fixed server port.
    let Ok(listener) = std::net::TcpListener::bind("127.0.0.1:8545") else {
        return;
    };
    drop(listener);

    let dir = tempfile::tempdir().unwrap();
    let events = dir.path().join("events.jsonl");
    let events_arg = events.to_string_lossy().into_owned();

    let output = run_cli(&[
        "-v",
        "run",
        "--fixtures",
        &path("eth.yaml"),
        "--endpoint",
        "127.0.0.1",
        "--only",
        "eth_chainId",
        "--canonical-only",
        "--timeout",
        "5",
        "--format",
        "json",
        "--events-file",
        &events_arg,
    ]);
    assert_eq!(output.status.code(), Some(4), "{}", stderr(&output));
    assert!(stderr(&output).contains("event stream written"), "{}", stderr(&output));
    assert_eq!(std::fs::read_to_string(&events).unwrap().lines().count(), 3);

    let report: Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(report["errored"], 1);
    assert_eq!(report["endpoint"], "http://127.0.0.1:8545/");
    assert_eq!(report["cases"][0]["verdict"], "error");
    assert_eq!(report["cases"][0]["error"]["kind"], "connection_failed");
}
