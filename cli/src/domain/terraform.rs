//! Terraform invocation options and pure helpers.
//!
//! Everything here is data in, data out: argument lists are built as
//! `Vec<String>` and output parsing works on captured bytes. Process
//! execution lives in `crate::infra::terraform`.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

use regex::Regex;

use crate::domain::error::TerraformError;

/// Default retry budget applied by [`TerraformOptions::with_default_retryable_errors`].
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Default pause between retries.
pub const DEFAULT_TIME_BETWEEN_RETRIES: Duration = Duration::from_secs(5);

/// Default timeout for `init`, `apply` and `destroy`.
pub const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(30 * 60);

/// Default timeout for `output`.
pub const DEFAULT_OUTPUT_TIMEOUT: Duration = Duration::from_secs(60);

const TRANSIENT_PLUGIN_FAILURE: &str = "Failed to retrieve plugin due to transient network error.";

/// Transient failures worth retrying, as `(pattern, description)`.
pub const DEFAULT_RETRYABLE_ERRORS: &[(&str, &str)] = &[
    (
        ".*read: connection reset by peer.*",
        "Failed to reach remote endpoint (connection reset).",
    ),
    (".*transport is closing.*", "Provider transport closed."),
    (".*unable to verify signature.*", TRANSIENT_PLUGIN_FAILURE),
    (".*unable to verify checksum.*", TRANSIENT_PLUGIN_FAILURE),
    (".*no provider exists with the given name.*", TRANSIENT_PLUGIN_FAILURE),
    (".*registry service is unreachable.*", TRANSIENT_PLUGIN_FAILURE),
    (".*Error installing provider.*", TRANSIENT_PLUGIN_FAILURE),
    (".*Failed to query available provider packages.*", TRANSIENT_PLUGIN_FAILURE),
    (".*timeout while waiting for plugin to start.*", TRANSIENT_PLUGIN_FAILURE),
    (".*timed out waiting for server handshake.*", TRANSIENT_PLUGIN_FAILURE),
    ("could not query provider registry for", TRANSIENT_PLUGIN_FAILURE),
];

/// Terraform subcommands the driver issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Subcommand {
    Init,
    Apply,
    Output,
    Destroy,
}

impl Subcommand {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Init => "init",
            Self::Apply => "apply",
            Self::Output => "output",
            Self::Destroy => "destroy",
        }
    }

    /// Whether `-var` flags are passed to this subcommand.
    #[must_use]
    pub fn takes_vars(self) -> bool {
        matches!(self, Self::Apply | Self::Destroy)
    }

    fn fixed_flags(self) -> &'static [&'static str] {
        match self {
            Self::Init => &["-input=false"],
            Self::Apply | Self::Destroy => &["-input=false", "-auto-approve"],
            Self::Output => &[],
        }
    }
}

impl std::fmt::Display for Subcommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How to invoke Terraform for one run.
#[derive(Debug, Clone)]
pub struct TerraformOptions {
    /// Directory holding the root module.
    pub terraform_dir: PathBuf,
    /// Terraform executable name or path.
    pub binary: String,
    /// Input variables, emitted as `-var key=value` in key order.
    pub vars: BTreeMap<String, String>,
    /// Pass `-no-color` to every subcommand.
    pub no_color: bool,
    /// Regex pattern → human-readable reason.
    pub retryable_errors: BTreeMap<String, String>,
    pub max_retries: u32,
    pub time_between_retries: Duration,
    /// Timeout for `init`, `apply` and `destroy`.
    pub timeout: Duration,
    /// Timeout for `output`.
    pub output_timeout: Duration,
}

impl TerraformOptions {
    /// Options with no retries and default timeouts.
    #[must_use]
    pub fn new(terraform_dir: impl Into<PathBuf>) -> Self {
        Self {
            terraform_dir: terraform_dir.into(),
            binary: "terraform".to_string(),
            vars: BTreeMap::new(),
            no_color: true,
            retryable_errors: BTreeMap::new(),
            max_retries: 0,
            time_between_retries: Duration::ZERO,
            timeout: DEFAULT_COMMAND_TIMEOUT,
            output_timeout: DEFAULT_OUTPUT_TIMEOUT,
        }
    }

    /// Fill in the default retryable-error table and retry budget.
    ///
    /// Fields already set by the caller are left alone.
    #[must_use]
    pub fn with_default_retryable_errors(mut self) -> Self {
        if self.retryable_errors.is_empty() {
            self.retryable_errors = DEFAULT_RETRYABLE_ERRORS
                .iter()
                .map(|(p, d)| ((*p).to_string(), (*d).to_string()))
                .collect();
        }
        if self.max_retries == 0 {
            self.max_retries = DEFAULT_MAX_RETRIES;
        }
        if self.time_between_retries.is_zero() {
            self.time_between_retries = DEFAULT_TIME_BETWEEN_RETRIES;
        }
        self
    }

    /// Replace the variable set.
    #[must_use]
    pub fn with_vars(mut self, vars: BTreeMap<String, String>) -> Self {
        self.vars = vars;
        self
    }

    /// Build the full argument list for `subcommand`.
    ///
    /// Layout: `-chdir=<dir> <subcommand> <fixed flags> [-no-color] <extra...> [-var k=v ...]`.
    #[must_use]
    pub fn format_args(&self, subcommand: Subcommand, extra: &[&str]) -> Vec<String> {
        let mut args = vec![
            format!("-chdir={}", self.terraform_dir.display()),
            subcommand.as_str().to_string(),
        ];
        args.extend(subcommand.fixed_flags().iter().map(|s| (*s).to_string()));
        if self.no_color {
            args.push("-no-color".to_string());
        }
        args.extend(extra.iter().map(|s| (*s).to_string()));
        if subcommand.takes_vars() {
            for (key, value) in &self.vars {
                args.push("-var".to_string());
                args.push(format!("{key}={value}"));
            }
        }
        args
    }

    /// Timeout for `subcommand`.
    #[must_use]
    pub fn timeout_for(&self, subcommand: Subcommand) -> Duration {
        match subcommand {
            Subcommand::Output => self.output_timeout,
            _ => self.timeout,
        }
    }

    /// Compile the retryable-error table.
    ///
    /// # Errors
    ///
    /// Returns [`TerraformError::InvalidPattern`] for the first pattern that
    /// does not compile.
    pub fn retry_matcher(&self) -> Result<RetryMatcher, TerraformError> {
        let rules = self
            .retryable_errors
            .iter()
            .map(|(pattern, reason)| {
                Regex::new(pattern)
                    .map(|re| (re, reason.clone()))
                    .map_err(|e| TerraformError::InvalidPattern {
                        pattern: pattern.clone(),
                        reason: e.to_string(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(RetryMatcher { rules })
    }
}

/// Compiled retryable-error table.
#[derive(Debug)]
pub struct RetryMatcher {
    rules: Vec<(Regex, String)>,
}

impl RetryMatcher {
    /// Returns the reason of the first rule matching `output`.
    #[must_use]
    pub fn matches(&self, output: &str) -> Option<&str> {
        self.rules
            .iter()
            .find(|(re, _)| re.is_match(output))
            .map(|(_, reason)| reason.as_str())
    }
}

/// Parse the stdout of `terraform output -json <name>`.
///
/// A JSON string yields its contents; any other JSON value yields its
/// compact JSON text.
///
/// # Errors
///
/// Returns an error if the output is empty or not JSON.
pub fn parse_output_value(name: &str, stdout: &[u8]) -> Result<String, TerraformError> {
    let text = String::from_utf8_lossy(stdout);
    let text = text.trim();
    if text.is_empty() {
        return Err(TerraformError::EmptyOutput(name.to_string()));
    }
    let value: serde_json::Value =
        serde_json::from_str(text).map_err(|e| TerraformError::MalformedOutput {
            name: name.to_string(),
            reason: e.to_string(),
        })?;
    match value {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Null => Err(TerraformError::EmptyOutput(name.to_string())),
        other => Ok(other.to_string()),
    }
}
