//! Application context: unified state passed to every command handler.
//!
//! `AppContext` is built once in `Cli::run()` from the global flags and the
//! config file, so command handlers never construct their own output context,
//! config, or terraform adapter.

use std::path::PathBuf;

use anyhow::Result;

use crate::application::ports::ConfigStore;
use crate::domain::config::E2eConfig;
use crate::infra::command_runner::TokioCommandRunner;
use crate::infra::terraform::TerraformCli;
use crate::output::OutputContext;

/// Output rendering mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-readable terminal output (default).
    Human,
    /// Machine-readable JSON output.
    Json,
}

/// Flags passed from the top-level CLI to `AppContext::new`.
pub struct AppFlags {
    /// Disable ANSI color output.
    pub no_color: bool,
    /// Suppress non-error output.
    pub quiet: bool,
    /// Enable JSON output mode.
    pub json: bool,
    /// Override of `terraform.dir`.
    pub terraform_dir: Option<PathBuf>,
}

/// Unified application context passed to every command handler.
pub struct AppContext {
    /// Terminal output context (colors, quiet mode).
    pub output: OutputContext,
    /// Output rendering mode (human vs JSON).
    pub mode: OutputMode,
    /// Effective configuration after CLI overrides.
    pub config: E2eConfig,
    /// Where the configuration was looked up.
    pub config_path: PathBuf,
    /// Terraform adapter.
    pub provisioner: TerraformCli<TokioCommandRunner>,
}

impl AppContext {
    /// Construct an `AppContext` from top-level CLI flags.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be read or is invalid.
    pub fn new(flags: AppFlags, store: &impl ConfigStore) -> Result<Self> {
        let mut config = store.load()?;
        if let Some(dir) = flags.terraform_dir {
            config.terraform.dir = dir;
        }

        let mode = if flags.json {
            OutputMode::Json
        } else {
            OutputMode::Human
        };

        Ok(Self {
            output: OutputContext::new(flags.no_color, flags.quiet || flags.json),
            mode,
            config,
            config_path: store.path()?,
            provisioner: TerraformCli::default_runner(),
        })
    }

    /// Returns `true` when JSON output mode is active.
    #[must_use]
    pub fn is_json(&self) -> bool {
        self.mode == OutputMode::Json
    }

    /// Resolve the environment label: explicit flag first, then config.
    #[must_use]
    pub fn environment<'a>(&'a self, flag: Option<&'a str>) -> &'a str {
        flag.unwrap_or(&self.config.environment)
    }
}
