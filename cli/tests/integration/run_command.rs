//! `run`, `apply`, `output` and `destroy` against the fake terraform binary.

#![cfg(unix)]
#![allow(clippy::expect_used)]

use predicates::prelude::*;

use crate::cli_tests::jokester;
use crate::fake_terraform::FakeTerraform;

fn with_fake(fake: &FakeTerraform) -> assert_cmd::Command {
    let mut cmd = jokester();
    cmd.env("JOKESTER_E2E_CONFIG", fake.config());
    cmd
}

#[test]
fn test_run_applies_verifies_and_destroys() {
    let fake = FakeTerraform::new();

    with_fake(&fake)
        .args(["run", "--suffix=-test-abc123"])
        .assert()
        .success()
        .stdout(predicate::str::contains("jokester-test-abc123 passed"));

    assert_eq!(fake.calls(), vec!["init", "apply", "output", "destroy"]);
}

#[test]
fn test_run_json_reports_outcome() {
    let fake = FakeTerraform::new();

    let out = with_fake(&fake)
        .args(["run", "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let v: serde_json::Value = serde_json::from_slice(&out).expect("valid JSON");
    let run = &v["runs"][0];
    assert_eq!(run["ok"], true);
    let suffix = run["resource_suffix"].as_str().expect("suffix");
    assert!(suffix.starts_with("-test-"));
    assert_eq!(
        run["report"]["function_name"].as_str(),
        Some(format!("jokester{suffix}").as_str())
    );
}

#[test]
fn test_run_name_mismatch_fails_and_still_destroys() {
    let fake = FakeTerraform::new();
    fake.report_name("jokester-prod");

    with_fake(&fake)
        .args(["run", "--suffix=-test-abc123"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Expected function name to be jokester-test-abc123, got jokester-prod",
        ));

    assert_eq!(fake.calls().last().map(String::as_str), Some("destroy"));
}

#[test]
fn test_run_apply_failure_still_destroys() {
    let fake = FakeTerraform::new();
    fake.fail_apply();

    with_fake(&fake)
        .args(["run"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("AccessDenied"));

    assert_eq!(fake.calls(), vec!["init", "apply", "destroy"]);
}

#[test]
fn test_run_isolated_leaves_module_untouched() {
    let fake = FakeTerraform::new();

    with_fake(&fake)
        .args(["run", "--isolate"])
        .assert()
        .success();

    assert!(fake.calls().is_empty(), "isolated run wrote to the source module");
}

#[test]
fn test_run_concurrent_runs_all_pass() {
    let fake = FakeTerraform::new();

    let out = with_fake(&fake)
        .args(["run", "--runs", "3", "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let v: serde_json::Value = serde_json::from_slice(&out).expect("valid JSON");
    let runs = v["runs"].as_array().expect("runs array");
    assert_eq!(runs.len(), 3);
    assert!(runs.iter().all(|r| r["ok"] == true));
    let suffixes: std::collections::HashSet<_> =
        runs.iter().map(|r| r["resource_suffix"].to_string()).collect();
    assert_eq!(suffixes.len(), 3);
}

#[test]
fn test_apply_output_destroy_round() {
    let fake = FakeTerraform::new();

    with_fake(&fake)
        .args(["apply", "--suffix=-test-abc123"])
        .assert()
        .success()
        .stdout(predicate::str::contains("jokester-test-abc123"));

    with_fake(&fake)
        .args(["output", "--verify-suffix=-test-abc123"])
        .assert()
        .success()
        .stdout("jokester-test-abc123\n");

    with_fake(&fake)
        .args(["destroy", "--suffix=-test-abc123"])
        .assert()
        .success();

    assert_eq!(fake.calls(), vec!["init", "apply", "output", "destroy"]);
}
