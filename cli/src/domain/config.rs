//! Domain types and validators for driver configuration.
//!
//! Pure functions only: no I/O, no async, no filesystem access.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::error::ConfigError;
use crate::domain::run::DEFAULT_ENVIRONMENT;
use crate::domain::terraform::{
    DEFAULT_COMMAND_TIMEOUT, DEFAULT_MAX_RETRIES, DEFAULT_TIME_BETWEEN_RETRIES, TerraformOptions,
};

/// Config file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "jokester-e2e.yaml";

/// Environment variable overriding the config file path.
pub const CONFIG_PATH_ENV: &str = "JOKESTER_E2E_CONFIG";

// ── Config schema ────────────────────────────────────────────────────────────

/// Top-level configuration stored in `jokester-e2e.yaml`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct E2eConfig {
    /// Environment label passed as the `environment` variable.
    pub environment: String,
    /// Terraform invocation settings.
    pub terraform: TerraformSettings,
}

impl Default for E2eConfig {
    fn default() -> Self {
        Self {
            environment: DEFAULT_ENVIRONMENT.to_string(),
            terraform: TerraformSettings::default(),
        }
    }
}

/// Terraform settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TerraformSettings {
    /// Root module directory.
    pub dir: PathBuf,
    /// Terraform executable.
    pub binary: String,
    pub max_retries: u32,
    pub time_between_retries_secs: u64,
    /// Timeout for `init`, `apply` and `destroy`.
    pub timeout_secs: u64,
    pub no_color: bool,
    /// Patterns retried in addition to the built-in table.
    pub extra_retryable_errors: BTreeMap<String, String>,
}

impl Default for TerraformSettings {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
            binary: "terraform".to_string(),
            max_retries: DEFAULT_MAX_RETRIES,
            time_between_retries_secs: DEFAULT_TIME_BETWEEN_RETRIES.as_secs(),
            timeout_secs: DEFAULT_COMMAND_TIMEOUT.as_secs(),
            no_color: true,
            extra_retryable_errors: BTreeMap::new(),
        }
    }
}

impl E2eConfig {
    /// Check values that serde cannot.
    ///
    /// # Errors
    ///
    /// Returns an error for a blank environment, blank binary, or zero timeout.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.environment.trim().is_empty() {
            return Err(invalid("environment", &self.environment, "Must not be empty."));
        }
        if self.terraform.binary.trim().is_empty() {
            return Err(invalid(
                "terraform.binary",
                &self.terraform.binary,
                "Must name a terraform executable.",
            ));
        }
        if self.terraform.timeout_secs == 0 {
            return Err(invalid(
                "terraform.timeout_secs",
                "0",
                "Must be at least 1 second.",
            ));
        }
        Ok(())
    }

    /// Build Terraform options from this config, with the built-in
    /// retryable-error table merged under any extra patterns.
    #[must_use]
    pub fn terraform_options(&self) -> TerraformOptions {
        let tf = &self.terraform;
        let mut opts = TerraformOptions::new(&tf.dir).with_default_retryable_errors();
        opts.binary.clone_from(&tf.binary);
        opts.no_color = tf.no_color;
        opts.max_retries = tf.max_retries;
        opts.time_between_retries = Duration::from_secs(tf.time_between_retries_secs);
        opts.timeout = Duration::from_secs(tf.timeout_secs);
        opts.retryable_errors.extend(
            tf.extra_retryable_errors
                .iter()
                .map(|(k, v)| (k.clone(), v.clone())),
        );
        opts
    }
}

fn invalid(key: &str, value: &str, hint: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
        hint: hint.to_string(),
    }
}
