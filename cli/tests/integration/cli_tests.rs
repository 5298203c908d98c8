//! Integration tests for the CLI surface: help, version, global flags and
//! error reporting.

#![allow(clippy::expect_used)]

use predicates::prelude::*;

use crate::Sandbox;

// --- Help and version tests ---

#[test]
fn test_cli_help_flag_shows_commands() {
    Sandbox::new()
        .pusher()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("push"))
        .stdout(predicate::str::contains("prepare"))
        .stdout(predicate::str::contains("threads"));
}

#[test]
fn test_cli_version_flag_shows_version() {
    Sandbox::new()
        .pusher()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_version_command_shows_version() {
    Sandbox::new()
        .pusher()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains(format!(
            "pusher v{}",
            env!("CARGO_PKG_VERSION")
        )));
}

#[test]
fn test_version_command_json_outputs_valid_json() {
    let output = Sandbox::new()
        .pusher()
        .args(["version", "--json"])
        .output()
        .expect("run");
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    assert_eq!(value["version"], env!("CARGO_PKG_VERSION"));
}

#[test]
fn test_unknown_command_is_a_usage_error() {
    Sandbox::new()
        .pusher()
        .arg("deploy-everything")
        .assert()
        .code(2);
}

#[test]
fn test_dc_alias_resolves_to_disconnect() {
    Sandbox::new()
        .pusher()
        .args(["dc", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("adb"));
}

// --- First run ---

#[test]
fn test_bare_push_without_profiles_fails_non_interactively() {
    Sandbox::new()
        .pusher()
        .arg("-y")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("No robot profiles configured"));
}

#[test]
fn test_push_without_profiles_in_ci_fails() {
    Sandbox::new()
        .pusher()
        .arg("push")
        .env("CI", "true")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("pusher profile add"));
}

#[test]
fn test_json_errors_have_fixed_shape() {
    let output = Sandbox::new()
        .pusher()
        .args(["push", "--yes", "--json"])
        .output()
        .expect("run");
    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty(), "stdout should stay clean");
    let value: serde_json::Value = serde_json::from_slice(&output.stderr).expect("valid JSON");
    assert_eq!(value["error"], true);
    assert_eq!(value["code"], "error");
    assert!(
        value["message"]
            .as_str()
            .expect("message")
            .contains("No robot profiles")
    );
}

// --- Configuration errors surface before any network work ---

#[test]
fn test_invalid_subnet_prefix_is_reported() {
    let sandbox = Sandbox::new();
    sandbox.write_config("network:\n  subnet_prefix: 192.168\n");
    sandbox
        .pusher()
        .arg("connect")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid subnet prefix '192.168'"));
}

#[test]
fn test_malformed_config_names_the_file() {
    let sandbox = Sandbox::new();
    sandbox.write_config("threads: [\n");
    sandbox
        .pusher()
        .arg("threads")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("cannot parse"))
        .stderr(predicate::str::contains("config.yaml"));
}
