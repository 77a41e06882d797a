//! Infrastructure implementation of the provisioning port traits.
//!
//! `TerraformCli<R>` routes all terraform CLI calls through a
//! `CommandRunner`, retrying failures whose output matches the options'
//! retryable-error table.

use std::process::Output;
use std::time::Instant;

use anyhow::{Context, Result};

use crate::application::ports::{CommandRunner, OutputReader, StackLifecycle};
use crate::domain::error::TerraformError;
use crate::domain::terraform::{Subcommand, TerraformOptions, parse_output_value};
use crate::infra::command_runner::{DEFAULT_CMD_TIMEOUT, TokioCommandRunner};

/// Infrastructure adapter that routes all terraform CLI calls through a `CommandRunner`.
///
/// Generic over `R: CommandRunner` so that tests can inject a mock runner
/// without spawning real processes.
pub struct TerraformCli<R: CommandRunner> {
    runner: R,
}

impl<R: CommandRunner> TerraformCli<R> {
    pub fn new(runner: R) -> Self {
        Self { runner }
    }

    /// Run `subcommand`, retrying retryable failures, and return its stdout.
    async fn run_with_retries(
        &self,
        opts: &TerraformOptions,
        subcommand: Subcommand,
        extra: &[&str],
    ) -> Result<String> {
        let matcher = opts.retry_matcher()?;
        let args = opts.format_args(subcommand, extra);
        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        let timeout = opts.timeout_for(subcommand);

        let mut attempt: u32 = 0;
        loop {
            attempt += 1;
            let started = Instant::now();
            tracing::info!(%subcommand, attempt, dir = %opts.terraform_dir.display(), "running terraform");
            let output = self
                .runner
                .run_with_timeout(&opts.binary, &args, timeout)
                .await
                .with_context(|| format!("terraform {subcommand}"))?;
            tracing::debug!(
                %subcommand,
                elapsed_secs = started.elapsed().as_secs_f64(),
                stdout = %String::from_utf8_lossy(&output.stdout),
                "terraform finished"
            );

            if output.status.success() {
                return Ok(String::from_utf8_lossy(&output.stdout).into_owned());
            }

            let combined = combined_output(&output);
            let Some(reason) = matcher.matches(&combined) else {
                return Err(TerraformError::CommandFailed {
                    subcommand: subcommand.to_string(),
                    code: exit_code(&output),
                    output: combined,
                }
                .into());
            };

            if attempt > opts.max_retries {
                return Err(TerraformError::RetriesExhausted {
                    subcommand: subcommand.to_string(),
                    attempts: attempt,
                    reason: reason.to_string(),
                    output: combined,
                }
                .into());
            }

            tracing::warn!(
                %subcommand,
                attempt,
                max_retries = opts.max_retries,
                reason,
                "retryable terraform error, retrying in {}s",
                opts.time_between_retries.as_secs()
            );
            tokio::time::sleep(opts.time_between_retries).await;
        }
    }
}

impl TerraformCli<TokioCommandRunner> {
    /// Convenience constructor for production use.
    #[must_use]
    pub fn default_runner() -> Self {
        Self::new(TokioCommandRunner::new(DEFAULT_CMD_TIMEOUT).with_env("TF_IN_AUTOMATION", "1"))
    }
}

impl<R: CommandRunner> StackLifecycle for TerraformCli<R> {
    async fn init(&self, opts: &TerraformOptions) -> Result<String> {
        self.run_with_retries(opts, Subcommand::Init, &[]).await
    }

    async fn apply(&self, opts: &TerraformOptions) -> Result<String> {
        self.run_with_retries(opts, Subcommand::Apply, &[]).await
    }

    async fn destroy(&self, opts: &TerraformOptions) -> Result<String> {
        self.run_with_retries(opts, Subcommand::Destroy, &[]).await
    }
}

impl<R: CommandRunner> OutputReader for TerraformCli<R> {
    async fn output(&self, opts: &TerraformOptions, name: &str) -> Result<String> {
        let stdout = self
            .run_with_retries(opts, Subcommand::Output, &["-json", name])
            .await?;
        Ok(parse_output_value(name, stdout.as_bytes())?)
    }
}

fn combined_output(output: &Output) -> String {
    let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
    if !output.stderr.is_empty() {
        if !text.is_empty() && !text.ends_with('\n') {
            text.push('\n');
        }
        text.push_str(&String::from_utf8_lossy(&output.stderr));
    }
    text.trim_end().to_string()
}

fn exit_code(output: &Output) -> String {
    output
        .status
        .code()
        .map_or_else(|| "none".to_string(), |c| c.to_string())
}
