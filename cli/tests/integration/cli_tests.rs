//! CLI surface tests: help, version, suffix, joke, config.

#![allow(clippy::expect_used)]

use assert_cmd::Command;
use predicates::prelude::*;

pub fn jokester() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("jokester-e2e"));
    cmd.env("NO_COLOR", "1")
        .env_remove("JOKESTER_TERRAFORM_DIR")
        .env_remove("JOKE_TABLE_SUFFIX")
        .env("JOKESTER_E2E_CONFIG", "/nonexistent/jokester-e2e.yaml");
    cmd
}

#[test]
fn test_cli_no_args_shows_help_and_exits_two() {
    // An env-supplied global counts as an argument and would suppress the help.
    jokester()
        .env_remove("NO_COLOR")
        .assert()
        .code(2)
        .stderr(predicate::str::contains(
            "Provision, verify, and tear down the jokester function",
        ))
        .stderr(predicate::str::contains("Usage:"));
}

#[test]
fn test_cli_help_lists_commands() {
    jokester()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("run"))
        .stdout(predicate::str::contains("destroy"))
        .stdout(predicate::str::contains("suffix"));
}

#[test]
fn test_version_command_shows_version() {
    jokester()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains("jokester-e2e 0.1.0"));
}

#[test]
fn test_no_color_env_accepts_conventional_values() {
    for value in ["1", "0", "true", "yes", ""] {
        jokester()
            .env("NO_COLOR", value)
            .arg("version")
            .assert()
            .success()
            .stdout(predicate::str::contains("jokester-e2e 0.1.0"));
    }
}

#[test]
fn test_no_color_env_does_not_break_run_argument_parsing() {
    jokester()
        .env("NO_COLOR", "1")
        .args(["run", "--suffix=-test-ABC"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid resource suffix"));
}

#[test]
fn test_version_command_json() {
    jokester()
        .args(["version", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#"{"version":"0.1.0"}"#));
}

#[test]
fn test_suffix_command_prints_generated_suffix() {
    jokester()
        .arg("suffix")
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"^-test-[a-z0-9]{6}\n$").expect("valid regex"));
}

#[test]
fn test_suffix_command_json_includes_expected_name() {
    let out = jokester()
        .args(["suffix", "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let v: serde_json::Value = serde_json::from_slice(&out).expect("valid JSON");
    let suffix = v["resource_suffix"].as_str().expect("suffix string");
    assert_eq!(
        v["expected_function_name"].as_str(),
        Some(format!("jokester{suffix}").as_str())
    );
}

#[test]
fn test_joke_without_id_returns_error_object() {
    jokester()
        .arg("joke")
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""Error": "no jokeID provided""#));
}

#[test]
fn test_joke_rejects_malformed_event() {
    jokester()
        .args(["joke", "--event", "{not json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--event is not a valid event"));
}

#[test]
fn test_destroy_requires_suffix() {
    jokester()
        .arg("destroy")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--suffix is required"));
}

#[test]
fn test_destroy_rejects_uppercase_suffix_with_json_error() {
    jokester()
        .args(["destroy", "--suffix=-test-ABC", "--json"])
        .assert()
        .failure()
        .stdout(predicate::str::contains(r#""code": "INVALID_RUN""#));
}

#[test]
fn test_run_rejects_suffix_with_multiple_runs() {
    jokester()
        .args(["run", "--suffix=-test-abc123", "--runs", "2"])
        .assert()
        .code(2);
}

#[test]
fn test_config_show_defaults_when_file_missing() {
    jokester()
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("not found, using defaults"))
        .stdout(predicate::str::contains("environment: test"))
        .stdout(predicate::str::contains("binary: terraform"));
}

#[test]
fn test_config_show_applies_terraform_dir_flag() {
    let out = jokester()
        .args(["config", "show", "--json", "--terraform-dir", "/srv/jokester"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let v: serde_json::Value = serde_json::from_slice(&out).expect("valid JSON");
    assert_eq!(v["exists"], false);
    assert_eq!(v["config"]["terraform"]["dir"], "/srv/jokester");
}
