//! Smoke tests for the todoprobe CLI
//!
//! Everything here runs on the in-process backend, so no browser is needed.

#![allow(deprecated)] // Allow deprecated Command::cargo_bin until assert_cmd is updated
#![allow(clippy::expect_used, clippy::unwrap_used)]

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;
use todomvc_probe::env;

/// Get a command for the todoprobe binary, isolated from the caller's env
fn todoprobe() -> Command {
    let mut cmd = Command::cargo_bin("todoprobe").expect("todoprobe binary should exist");
    for var in [
        env::BASE_URL,
        env::BACKEND,
        env::HEADLESS,
        env::CHROMIUM_PATH,
        env::WEBDRIVER_URL,
        env::TIMEOUT_MS,
        env::FIXTURE,
        "RUST_LOG",
    ] {
        cmd.env_remove(var);
    }
    cmd
}

// ============================================================================
// Basic CLI Tests
// ============================================================================

#[test]
fn test_version_flag() {
    todoprobe()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("0.4.0"));
}

#[test]
fn test_help_flag() {
    todoprobe()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("run"))
        .stdout(predicate::str::contains("list"))
        .stdout(predicate::str::contains("config"));
}

#[test]
fn test_no_args_fails() {
    todoprobe().assert().failure();
}

#[test]
fn test_run_subcommand_help() {
    todoprobe()
        .args(["run", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--backend"))
        .stdout(predicate::str::contains("--fail-fast"));
}

// ============================================================================
// List
// ============================================================================

#[test]
fn test_list_all_scenarios() {
    let output = todoprobe().arg("list").assert().success();
    let stdout = String::from_utf8(output.get_output().stdout.clone()).unwrap();
    assert_eq!(stdout.lines().count(), 20);
    assert!(stdout.contains("adds_new_todo"));
    assert!(stdout.contains("clear_completed_removes_finished_todos"));
}

#[test]
fn test_list_with_filter() {
    todoprobe()
        .args(["list", "--filter", "escape"])
        .assert()
        .success()
        .stdout(predicate::str::contains("edit_reverts_on_escape"))
        .stdout(predicate::str::contains("adds_new_todo").not());
}

#[test]
fn test_list_json() {
    let output = todoprobe()
        .args(["list", "--format", "json"])
        .assert()
        .success();
    let value: serde_json::Value = serde_json::from_slice(&output.get_output().stdout).unwrap();
    assert_eq!(value.as_array().unwrap().len(), 20);
}

// ============================================================================
// Run
// ============================================================================

#[test]
fn test_run_memory_backend() {
    todoprobe()
        .args(["--color", "never", "run", "--backend", "memory"])
        .assert()
        .success()
        .stderr(predicate::str::contains("PASSED 20 scenarios"));
}

#[test]
fn test_run_memory_backend_json() {
    let output = todoprobe()
        .args(["run", "--backend", "memory", "--format", "json"])
        .assert()
        .success();
    let value: serde_json::Value = serde_json::from_slice(&output.get_output().stdout).unwrap();
    assert_eq!(value["backend"], "memory");
    assert_eq!(value["results"].as_array().unwrap().len(), 20);
    assert!(value["results"][0]["duration_ms"].is_u64());
}

#[test]
fn test_run_with_filter() {
    todoprobe()
        .args([
            "--color", "never", "run", "--backend", "memory", "--filter", "counter",
        ])
        .assert()
        .success()
        .stderr(predicate::str::contains("counter_pluralizes"))
        .stderr(predicate::str::contains("PASSED 1 scenarios"));
}

#[test]
fn test_run_unmatched_filter_fails() {
    todoprobe()
        .args(["run", "--backend", "memory", "--filter", "nothing-matches"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no scenario matches"));
}

#[test]
fn test_run_with_custom_fixture() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("todos.json");
    fs::write(&path, r#"{"todos": ["Water plants", "File taxes", "Call mom"]}"#).unwrap();

    todoprobe()
        .args(["run", "--backend", "memory", "--fixture"])
        .arg(&path)
        .assert()
        .success();
}

#[test]
fn test_run_with_invalid_fixture_fails() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("todos.json");
    fs::write(&path, r#"{"todos": ["only one"]}"#).unwrap();

    todoprobe()
        .args(["run", "--backend", "memory", "--fixture"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

// ============================================================================
// Config
// ============================================================================

#[test]
fn test_config_prints_yaml() {
    todoprobe()
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "base_url: https://todomvc-vanillajs.test-targets.dev/",
        ))
        .stdout(predicate::str::contains("backend: cdp"));
}

#[test]
fn test_config_layers_file_env_and_flags() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("probe.yaml");
    fs::write(&path, "base_url: http://file.example/\ntimeout_ms: 900\n").unwrap();

    todoprobe()
        .env(env::TIMEOUT_MS, "1200")
        .args(["config", "--backend", "webdriver", "--config"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("base_url: http://file.example/"))
        .stdout(predicate::str::contains("timeout_ms: 1200"))
        .stdout(predicate::str::contains("backend: webdriver"));
}

#[test]
fn test_config_ignores_caller_environment() {
    let mut cmd = todoprobe();
    cmd.env(env::WEBDRIVER_URL, "http://grid.example:4444");
    cmd.env(env::CHROMIUM_PATH, "/opt/chromium/chrome");
    cmd.arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("webdriver_url: http://grid.example:4444"))
        .stdout(predicate::str::contains("chromium_path: /opt/chromium/chrome"));

    todoprobe()
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("webdriver_url: http://localhost:4444"))
        .stdout(predicate::str::contains("chromium_path: null"));
}

#[test]
fn test_config_yaml_checked_after_flags() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("probe.yaml");
    fs::write(&path, "poll_interval_ms: 5000\n").unwrap();

    todoprobe()
        .args(["config", "--config"])
        .arg(&path)
        .assert()
        .failure();

    todoprobe()
        .args(["config", "--timeout-ms", "10000", "--config"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("poll_interval_ms: 5000"));
}

#[test]
fn test_config_rejects_zero_timeout() {
    todoprobe()
        .args(["config", "--timeout-ms", "0"])
        .assert()
        .failure();
}
