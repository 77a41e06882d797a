//! `jokester-e2e apply`: provision without verifying or destroying.

use anyhow::Result;
use serde_json::json;

use crate::app::AppContext;
use crate::application::services::scenario::provision;
use crate::commands::TargetArgs;
use crate::domain::run::TestRun;
use crate::output::Mark;
use crate::output::reporter::{SilentReporter, TerminalReporter};

/// Run the apply command.
///
/// Without `--suffix` a new one is generated and printed so the stack can
/// be destroyed later.
///
/// # Errors
///
/// Returns an error if the suffix is invalid or `init`/`apply` fails.
pub async fn run(app: &AppContext, args: &TargetArgs) -> Result<()> {
    let environment = app.environment(args.environment.as_deref());
    let run = match &args.suffix {
        Some(suffix) => TestRun::with_suffix(environment, suffix)?,
        None => TestRun::generate(environment)?,
    };
    let base = app.config.terraform_options();

    if app.is_json() {
        provision(&app.provisioner, &SilentReporter, &base, &run).await?;
        crate::output::json::print(&json!({
            "environment": run.environment(),
            "resource_suffix": run.resource_suffix(),
            "expected_function_name": run.expected_function_name(),
        }))?;
        return Ok(());
    }

    let reporter = TerminalReporter::new(&app.output);
    let result = provision(&app.provisioner, &reporter, &base, &run).await;
    reporter.finish(result.is_ok());
    result?;

    app.output.kv("suffix", run.resource_suffix());
    app.output.kv("function", &run.expected_function_name());
    app.output.status(
        Mark::Hint,
        &format!(
            "Destroy with: jokester-e2e destroy --environment {} --suffix={}",
            run.environment(),
            run.resource_suffix()
        ),
    );
    Ok(())
}
