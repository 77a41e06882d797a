//! `jokester-e2e destroy`: tear down a previously applied stack.

use anyhow::{Context, Result};
use serde_json::json;

use crate::app::AppContext;
use crate::application::services::scenario::teardown;
use crate::commands::TargetArgs;
use crate::domain::run::TestRun;
use crate::output::reporter::{SilentReporter, TerminalReporter};

/// Run the destroy command.
///
/// # Errors
///
/// Returns an error if `--suffix` is missing or invalid, or `destroy` fails.
pub async fn run(app: &AppContext, args: &TargetArgs) -> Result<()> {
    let environment = app.environment(args.environment.as_deref());
    let suffix = args
        .suffix
        .as_deref()
        .context("--suffix is required to destroy a stack")?;
    let run = TestRun::with_suffix(environment, suffix)?;
    let base = app.config.terraform_options();

    if app.is_json() {
        teardown(&app.provisioner, &SilentReporter, &base, &run).await?;
        return crate::output::json::print(&json!({
            "resource_suffix": run.resource_suffix(),
            "destroyed": true,
        }));
    }

    let reporter = TerminalReporter::new(&app.output);
    let result = teardown(&app.provisioner, &reporter, &base, &run).await;
    reporter.finish(result.is_ok());
    result
}
