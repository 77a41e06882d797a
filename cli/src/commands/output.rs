//! `jokester-e2e output`: read one output of the applied stack.

use anyhow::Result;
use clap::Args;
use serde_json::json;

use crate::app::AppContext;
use crate::application::ports::OutputReader;
use crate::domain::run::{FUNCTION_NAME_OUTPUT, TestRun};

/// Arguments for the output command.
#[derive(Args, Debug)]
pub struct OutputArgs {
    /// Output name
    #[arg(long, short = 'n', default_value = FUNCTION_NAME_OUTPUT)]
    pub name: String,

    /// Check the value against the function name expected for this suffix
    #[arg(long)]
    pub verify_suffix: Option<String>,

    /// Environment label used with --verify-suffix
    #[arg(long, short = 'e', requires = "verify_suffix")]
    pub environment: Option<String>,
}

/// Run the output command.
///
/// # Errors
///
/// Returns an error if the output cannot be read, or if `--verify-suffix`
/// is given and the value does not match.
pub async fn run(app: &AppContext, args: &OutputArgs) -> Result<()> {
    let opts = app.config.terraform_options();
    let value = app.provisioner.output(&opts, &args.name).await?;

    if let Some(suffix) = &args.verify_suffix {
        let run = TestRun::with_suffix(app.environment(args.environment.as_deref()), suffix)?;
        run.verify_function_name(&value)?;
    }

    if app.is_json() {
        crate::output::json::print(&json!({ "name": args.name, "value": value }))
    } else {
        println!("{value}");
        Ok(())
    }
}
