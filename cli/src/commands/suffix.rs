//! `jokester-e2e suffix`: print a fresh resource suffix.

use anyhow::Result;
use serde_json::json;

use crate::domain::run::{DEFAULT_ENVIRONMENT, TestRun};

/// Run the suffix command.
///
/// # Errors
///
/// Never fails in practice; the generated suffix always validates.
pub fn run(json: bool) -> Result<()> {
    let run = TestRun::generate(DEFAULT_ENVIRONMENT)?;
    if json {
        crate::output::json::print(&json!({
            "resource_suffix": run.resource_suffix(),
            "expected_function_name": run.expected_function_name(),
        }))
    } else {
        println!("{}", run.resource_suffix());
        Ok(())
    }
}
