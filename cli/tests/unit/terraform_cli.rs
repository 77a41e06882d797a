//! Tests for `TerraformCli`: argument construction, retries, and output
//! parsing against a scripted `CommandRunner`.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::collections::BTreeMap;
use std::time::Duration;

use jokester_e2e::application::ports::{OutputReader, StackLifecycle};
use jokester_e2e::domain::error::TerraformError;
use jokester_e2e::domain::terraform::{DEFAULT_OUTPUT_TIMEOUT, TerraformOptions};
use jokester_e2e::infra::terraform::TerraformCli;

use crate::mocks::ScriptedRunner;

const PROVIDER_FLAKE: &[u8] = b"Error: Failed to query available provider packages\n\nCould not retrieve the list of available versions";

fn opts() -> TerraformOptions {
    let mut o = TerraformOptions::new("/module")
        .with_default_retryable_errors()
        .with_vars(BTreeMap::from([
            ("environment".to_string(), "test".to_string()),
            ("resource_suffix".to_string(), "-test-abc123".to_string()),
        ]));
    o.time_between_retries = Duration::ZERO;
    o
}

fn subcommands(runner: &ScriptedRunner) -> Vec<String> {
    runner
        .calls()
        .into_iter()
        .map(|(_, args)| args[1].clone())
        .collect()
}

#[tokio::test]
async fn test_apply_invokes_terraform_with_vars() {
    let runner = ScriptedRunner::new();
    let tf = TerraformCli::new(runner.clone());

    tf.apply(&opts()).await.unwrap();

    let calls = runner.calls();
    assert_eq!(calls.len(), 1);
    let (program, args) = &calls[0];
    assert_eq!(program, "terraform");
    assert_eq!(
        args,
        &vec![
            "-chdir=/module",
            "apply",
            "-input=false",
            "-auto-approve",
            "-no-color",
            "-var",
            "environment=test",
            "-var",
            "resource_suffix=-test-abc123",
        ]
    );
}

#[tokio::test]
async fn test_custom_binary_is_used() {
    let runner = ScriptedRunner::new();
    let tf = TerraformCli::new(runner.clone());
    let mut o = opts();
    o.binary = "/opt/tofu/bin/tofu".to_string();
    tf.init(&o).await.unwrap();
    assert_eq!(runner.calls()[0].0, "/opt/tofu/bin/tofu");
}

#[tokio::test]
async fn test_destroy_passes_vars() {
    let runner = ScriptedRunner::new();
    let tf = TerraformCli::new(runner.clone());
    tf.destroy(&opts()).await.unwrap();
    let (_, args) = &runner.calls()[0];
    assert_eq!(args[1], "destroy");
    assert!(args.contains(&"resource_suffix=-test-abc123".to_string()));
}

#[tokio::test]
async fn test_output_parses_json_string() {
    let runner = ScriptedRunner::new();
    runner.push_ok(b"\"jokester-test-abc123\"\n");
    let tf = TerraformCli::new(runner.clone());

    let value = tf.output(&opts(), "function_name").await.unwrap();

    assert_eq!(value, "jokester-test-abc123");
    let (_, args) = &runner.calls()[0];
    assert_eq!(
        args,
        &vec!["-chdir=/module", "output", "-no-color", "-json", "function_name"]
    );
    assert_eq!(runner.timeouts(), vec![DEFAULT_OUTPUT_TIMEOUT]);
}

#[tokio::test]
async fn test_retryable_failure_then_success_retries_once() {
    let runner = ScriptedRunner::new();
    runner.push_fail(1, PROVIDER_FLAKE).push_ok(b"Terraform has been successfully initialized!");
    let tf = TerraformCli::new(runner.clone());

    tf.init(&opts()).await.unwrap();

    assert_eq!(subcommands(&runner), vec!["init", "init"]);
}

#[tokio::test]
async fn test_non_retryable_failure_fails_immediately() {
    let runner = ScriptedRunner::new();
    runner.push_fail(1, b"Error: Invalid reference\n  on main.tf line 3");
    let tf = TerraformCli::new(runner.clone());

    let err = tf.apply(&opts()).await.unwrap_err();

    assert_eq!(runner.calls().len(), 1);
    match err.downcast_ref::<TerraformError>() {
        Some(TerraformError::CommandFailed {
            subcommand,
            code,
            output,
        }) => {
            assert_eq!(subcommand, "apply");
            assert_eq!(code, "1");
            assert!(output.contains("Invalid reference"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_retries_exhausted_after_max_retries_plus_one_attempts() {
    let runner = ScriptedRunner::new();
    for _ in 0..5 {
        runner.push_fail(1, PROVIDER_FLAKE);
    }
    let tf = TerraformCli::new(runner.clone());
    let mut o = opts();
    o.max_retries = 2;

    let err = tf.init(&o).await.unwrap_err();

    assert_eq!(runner.calls().len(), 3);
    assert!(matches!(
        err.downcast_ref::<TerraformError>(),
        Some(TerraformError::RetriesExhausted { attempts: 3, .. })
    ));
}

#[tokio::test]
async fn test_zero_retries_never_retries() {
    let runner = ScriptedRunner::new();
    runner.push_fail(1, PROVIDER_FLAKE).push_ok(b"");
    let tf = TerraformCli::new(runner.clone());
    let mut o = opts();
    o.max_retries = 0;

    assert!(tf.init(&o).await.is_err());
    assert_eq!(runner.calls().len(), 1);
}

#[tokio::test]
async fn test_spawn_error_is_not_retried() {
    let runner = ScriptedRunner::new();
    runner.push_spawn_error("No such file or directory");
    let tf = TerraformCli::new(runner.clone());

    let err = tf.init(&opts()).await.unwrap_err();

    assert_eq!(runner.calls().len(), 1);
    assert!(format!("{err:#}").contains("terraform init"));
}

#[tokio::test]
async fn test_invalid_retry_pattern_fails_before_running() {
    let runner = ScriptedRunner::new();
    let tf = TerraformCli::new(runner.clone());
    let mut o = opts();
    o.retryable_errors.insert("([".to_string(), "broken".to_string());

    let err = tf.apply(&o).await.unwrap_err();

    assert!(runner.calls().is_empty());
    assert!(matches!(
        err.downcast_ref::<TerraformError>(),
        Some(TerraformError::InvalidPattern { .. })
    ));
}

#[tokio::test]
async fn test_empty_output_is_an_error() {
    let runner = ScriptedRunner::new();
    runner.push_ok(b"");
    let tf = TerraformCli::new(runner.clone());
    let err = tf.output(&opts(), "function_name").await.unwrap_err();
    assert!(matches!(
        err.downcast_ref::<TerraformError>(),
        Some(TerraformError::EmptyOutput(_))
    ));
}
