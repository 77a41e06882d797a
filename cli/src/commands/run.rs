//! `jokester-e2e run`: provision, verify, and destroy in one go.

use std::process::ExitCode;

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use crate::app::AppContext;
use crate::application::services::scenario::run_scenarios;
use crate::domain::run::{ScenarioReport, TestRun};
use crate::domain::terraform::TerraformOptions;
use crate::infra::workspace::IsolatedWorkspace;
use crate::output::{Mark, json};
use crate::output::reporter::{SilentReporter, TerminalReporter};

/// Arguments for the run command.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Environment label (defaults to the configured environment)
    #[arg(long, short = 'e')]
    pub environment: Option<String>,

    /// Use this resource suffix instead of generating one
    #[arg(long, short = 's', conflicts_with = "runs")]
    pub suffix: Option<String>,

    /// Number of scenarios to run concurrently (implies --isolate above 1)
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u16).range(1..=16))]
    pub runs: u16,

    /// Run against a temporary copy of the terraform directory
    #[arg(long)]
    pub isolate: bool,
}

/// Per-run entry in the JSON summary.
#[derive(Debug, Serialize)]
struct RunOutcome {
    resource_suffix: String,
    ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    report: Option<ScenarioReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Run the run command.
///
/// # Errors
///
/// Returns an error if a run cannot be prepared (bad suffix, missing
/// terraform directory). Scenario failures are reported and turned into a
/// failing exit code.
pub async fn run(app: &AppContext, args: &RunArgs) -> Result<ExitCode> {
    let environment = app.environment(args.environment.as_deref());
    let base = app.config.terraform_options();
    let isolate = args.isolate || args.runs > 1;

    // Working copies must outlive the scenarios that use them.
    let mut workspaces = Vec::new();
    let mut runs: Vec<(TerraformOptions, TestRun)> = Vec::new();
    for _ in 0..args.runs {
        let run = match &args.suffix {
            Some(suffix) => TestRun::with_suffix(environment, suffix)?,
            None => TestRun::generate(environment)?,
        };
        let mut opts = base.clone();
        if isolate {
            let ws = IsolatedWorkspace::copy_from(&base.terraform_dir)?;
            opts.terraform_dir = ws.path().to_path_buf();
            workspaces.push(ws);
        }
        runs.push((opts, run));
    }

    let results = if app.is_json() {
        run_scenarios(&app.provisioner, &SilentReporter, &runs).await
    } else {
        app.output.header(&format!(
            "Running {} scenario(s) in {}",
            runs.len(),
            base.terraform_dir.display()
        ));
        let reporter = TerminalReporter::new(&app.output);
        let results = run_scenarios(&app.provisioner, &reporter, &runs).await;
        reporter.finish(results.iter().all(Result::is_ok));
        results
    };
    drop(workspaces);

    let outcomes: Vec<RunOutcome> = runs
        .iter()
        .zip(results)
        .map(|((_, run), result)| match result {
            Ok(report) => RunOutcome {
                resource_suffix: run.resource_suffix().to_string(),
                ok: true,
                report: Some(report),
                error: None,
            },
            Err(e) => RunOutcome {
                resource_suffix: run.resource_suffix().to_string(),
                ok: false,
                report: None,
                error: Some(format!("{e:#}")),
            },
        })
        .collect();
    let failed = outcomes.iter().filter(|o| !o.ok).count();

    if app.is_json() {
        json::print(&serde_json::json!({ "runs": outcomes }))?;
    } else {
        render_human(app, &outcomes);
    }

    Ok(if failed == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn render_human(app: &AppContext, outcomes: &[RunOutcome]) {
    for outcome in outcomes {
        match (&outcome.report, &outcome.error) {
            (Some(report), _) => {
                app.output.status(
                    Mark::Pass,
                    &format!(
                        "{} passed (apply {:.0}s, destroy {:.0}s)",
                        report.function_name, report.apply_secs, report.destroy_secs
                    ),
                );
            }
            (None, Some(error)) => {
                app.output.status(
                    Mark::Fail,
                    &format!("{} failed: {error}", outcome.resource_suffix),
                );
            }
            (None, None) => {}
        }
    }
}
