//! `jokester-e2e config`: inspect the effective configuration.

use anyhow::{Context, Result};
use clap::Subcommand;

use crate::app::AppContext;

/// Config subcommands.
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Show effective configuration
    Show,
}

/// Run the config command.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn run(app: &AppContext, cmd: &ConfigCommand) -> Result<()> {
    match cmd {
        ConfigCommand::Show => show_config(app),
    }
}

fn show_config(app: &AppContext) -> Result<()> {
    if app.is_json() {
        return crate::output::json::print(&serde_json::json!({
            "path": app.config_path.display().to_string(),
            "exists": app.config_path.exists(),
            "config": app.config,
        }));
    }
    let source = if app.config_path.exists() {
        app.config_path.display().to_string()
    } else {
        format!("{} (not found, using defaults)", app.config_path.display())
    };
    app.output.kv("source", &source);
    let yaml = serde_yaml::to_string(&app.config).context("cannot serialize config")?;
    print!("{yaml}");
    Ok(())
}
