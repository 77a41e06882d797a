//! CLI argument parsing with clap derive

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};

use crate::app::{AppContext, AppFlags};
use crate::commands;
use crate::infra::config::YamlConfigStore;

/// Provision, verify, and tear down the jokester function with Terraform
#[derive(Parser)]
#[command(
    name = "jokester-e2e",
    version,
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output (any `NO_COLOR` value except 0/false/no/off)
    #[arg(
        long,
        global = true,
        env = "NO_COLOR",
        value_parser = clap::builder::FalseyValueParser::new()
    )]
    pub no_color: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Terraform root module directory (overrides `terraform.dir`)
    #[arg(long, global = true, env = "JOKESTER_TERRAFORM_DIR")]
    pub terraform_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Apply, verify the function name, and destroy
    Run(commands::run::RunArgs),

    /// Apply only and print the suffix for a later destroy
    Apply(commands::TargetArgs),

    /// Read an output of the applied stack
    Output(commands::output::OutputArgs),

    /// Destroy a stack applied with the given suffix
    Destroy(commands::TargetArgs),

    /// Print a fresh resource suffix
    Suffix,

    /// Look up a joke the way the deployed function does
    Joke(commands::joke::JokeArgs),

    /// Inspect configuration
    #[command(subcommand)]
    Config(commands::config::ConfigCommand),

    /// Show version
    Version,
}

impl Cli {
    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded or the command fails.
    pub async fn run(self) -> Result<ExitCode> {
        let Cli {
            json,
            quiet,
            no_color,
            terraform_dir,
            command,
            ..
        } = self;

        match command {
            Command::Version => {
                commands::version::run(json);
                return Ok(ExitCode::SUCCESS);
            }
            Command::Suffix => {
                commands::suffix::run(json)?;
                return Ok(ExitCode::SUCCESS);
            }
            Command::Joke(args) => {
                commands::joke::run(&args).await?;
                return Ok(ExitCode::SUCCESS);
            }
            _ => {}
        }

        let app = AppContext::new(
            AppFlags {
                no_color,
                quiet,
                json,
                terraform_dir,
            },
            &YamlConfigStore,
        )?;

        match command {
            Command::Run(args) => commands::run::run(&app, &args).await,
            Command::Apply(args) => commands::apply::run(&app, &args)
                .await
                .map(|()| ExitCode::SUCCESS),
            Command::Output(args) => commands::output::run(&app, &args)
                .await
                .map(|()| ExitCode::SUCCESS),
            Command::Destroy(args) => commands::destroy::run(&app, &args)
                .await
                .map(|()| ExitCode::SUCCESS),
            Command::Config(cmd) => commands::config::run(&app, &cmd).map(|()| ExitCode::SUCCESS),
            Command::Version | Command::Suffix | Command::Joke(_) => Ok(ExitCode::SUCCESS),
        }
    }
}

/// Stable machine-readable code for a failed command.
#[must_use]
pub fn error_code(err: &anyhow::Error) -> &'static str {
    use crate::domain::error::{ConfigError, JokeError, RunError, TerraformError};

    for cause in err.chain() {
        if let Some(e) = cause.downcast_ref::<RunError>() {
            return match e {
                RunError::NameMismatch { .. } => "NAME_MISMATCH",
                RunError::InvalidSuffix(_) | RunError::EmptyEnvironment => "INVALID_RUN",
            };
        }
        if cause.downcast_ref::<TerraformError>().is_some() {
            return "TERRAFORM_FAILED";
        }
        if cause.downcast_ref::<JokeError>().is_some() {
            return "JOKE_LOOKUP_FAILED";
        }
        if cause.downcast_ref::<ConfigError>().is_some() {
            return "INVALID_CONFIG";
        }
    }
    "ERROR"
}
