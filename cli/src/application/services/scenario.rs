//! Application service: provision, verify, and tear down the jokester module.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.
//! All I/O is routed through injected port traits.

use anyhow::{Context, Result};
use futures_util::future::join_all;
use tokio::time::Instant;

use crate::application::ports::{ProgressReporter, Provisioner, StackLifecycle};
use crate::domain::run::{FUNCTION_NAME_OUTPUT, ScenarioReport, TestRun};
use crate::domain::terraform::TerraformOptions;

/// Options for `run` with the run's variables applied.
#[must_use]
pub fn options_for(base: &TerraformOptions, run: &TestRun) -> TerraformOptions {
    base.clone().with_vars(run.vars())
}

/// `init` followed by `apply`.
///
/// # Errors
///
/// Returns the first failing step's error.
pub async fn init_and_apply(provisioner: &impl StackLifecycle, opts: &TerraformOptions) -> Result<()> {
    provisioner.init(opts).await.context("terraform init")?;
    provisioner.apply(opts).await.context("terraform apply")?;
    Ok(())
}

/// Provision the module for `run` without verifying or destroying it.
///
/// # Errors
///
/// Returns an error if `init` or `apply` fails.
pub async fn provision(
    provisioner: &impl StackLifecycle,
    reporter: &impl ProgressReporter,
    base: &TerraformOptions,
    run: &TestRun,
) -> Result<()> {
    let opts = options_for(base, run);
    reporter.step(&format!(
        "applying {} (environment {})",
        run.resource_suffix(),
        run.environment()
    ));
    init_and_apply(provisioner, &opts).await?;
    reporter.success(&format!("applied {}", run.resource_suffix()));
    Ok(())
}

/// Destroy the module provisioned for `run`.
///
/// # Errors
///
/// Returns an error if `destroy` fails.
pub async fn teardown(
    provisioner: &impl StackLifecycle,
    reporter: &impl ProgressReporter,
    base: &TerraformOptions,
    run: &TestRun,
) -> Result<()> {
    let opts = options_for(base, run);
    reporter.step(&format!("destroying {}", run.resource_suffix()));
    provisioner
        .destroy(&opts)
        .await
        .context("terraform destroy")?;
    reporter.success(&format!("destroyed {}", run.resource_suffix()));
    Ok(())
}

/// Full scenario: apply, read `function_name`, compare, destroy.
///
/// `destroy` runs whenever provisioning was attempted, whatever the outcome
/// of apply, output retrieval, or the comparison. When both the scenario and
/// the teardown fail, the scenario error is returned and the teardown error
/// is reported as a warning.
///
/// # Errors
///
/// Returns the provisioning, output, or mismatch error, or the teardown error
/// when everything before it succeeded.
pub async fn run_scenario(
    provisioner: &impl Provisioner,
    reporter: &impl ProgressReporter,
    base: &TerraformOptions,
    run: &TestRun,
) -> Result<ScenarioReport> {
    let opts = options_for(base, run);

    let outcome = apply_and_verify(provisioner, reporter, &opts, run).await;

    let started = Instant::now();
    reporter.step(&format!("destroying {}", run.resource_suffix()));
    let destroyed = provisioner.destroy(&opts).await;
    let destroy_secs = started.elapsed().as_secs_f64();

    match (outcome, destroyed) {
        (Ok(verified), Ok(_)) => {
            reporter.success(&format!("destroyed {}", run.resource_suffix()));
            Ok(ScenarioReport {
                environment: run.environment().to_string(),
                resource_suffix: run.resource_suffix().to_string(),
                function_name: verified.function_name,
                apply_secs: verified.apply_secs,
                destroy_secs,
            })
        }
        (Ok(_), Err(e)) => Err(e.context(format!(
            "teardown failed for {}; resources may have leaked",
            run.resource_suffix()
        ))),
        (Err(e), Ok(_)) => {
            reporter.success(&format!("destroyed {}", run.resource_suffix()));
            Err(e)
        }
        (Err(e), Err(teardown)) => {
            tracing::error!(
                suffix = run.resource_suffix(),
                error = %format!("{teardown:#}"),
                "teardown failed after scenario failure"
            );
            reporter.warn(&format!(
                "teardown also failed for {}: {teardown:#}",
                run.resource_suffix()
            ));
            Err(e)
        }
    }
}

struct Verified {
    function_name: String,
    /// `init` + `apply` only; the output read is not included.
    apply_secs: f64,
}

async fn apply_and_verify(
    provisioner: &impl Provisioner,
    reporter: &impl ProgressReporter,
    opts: &TerraformOptions,
    run: &TestRun,
) -> Result<Verified> {
    reporter.step(&format!(
        "applying {} (environment {})",
        run.resource_suffix(),
        run.environment()
    ));
    let started = Instant::now();
    init_and_apply(provisioner, opts).await?;
    let apply_secs = started.elapsed().as_secs_f64();

    let function_name = provisioner
        .output(opts, FUNCTION_NAME_OUTPUT)
        .await
        .with_context(|| format!("terraform output {FUNCTION_NAME_OUTPUT}"))?;
    tracing::debug!(suffix = run.resource_suffix(), %function_name, "read output");

    run.verify_function_name(&function_name)?;
    reporter.success(&format!("function name verified: {function_name}"));
    Ok(Verified {
        function_name,
        apply_secs,
    })
}

/// Run several scenarios concurrently on the current task.
///
/// Each entry carries its own options so callers can point every run at a
/// separate working copy. Results are returned in input order.
pub async fn run_scenarios(
    provisioner: &impl Provisioner,
    reporter: &impl ProgressReporter,
    runs: &[(TerraformOptions, TestRun)],
) -> Vec<Result<ScenarioReport>> {
    join_all(
        runs.iter()
            .map(|(opts, run)| run_scenario(provisioner, reporter, opts, run)),
    )
    .await
}
