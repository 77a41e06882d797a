//! Test-run domain types and pure validation functions.
//!
//! A `TestRun` names one provisioning of the jokester module. It exists only
//! for the duration of a scenario and is never persisted.

use std::collections::BTreeMap;

use rand::Rng;
use rand::distributions::Alphanumeric;
use serde::Serialize;

use crate::domain::error::RunError;

/// Fixed prefix of the provisioned function name.
pub const FUNCTION_NAME_PREFIX: &str = "jokester";

/// Marker placed between the prefix and the unique ID in generated suffixes.
pub const SUFFIX_MARKER: &str = "-test-";

/// Terraform output holding the provisioned function name.
pub const FUNCTION_NAME_OUTPUT: &str = "function_name";

/// Default environment label passed to the module.
pub const DEFAULT_ENVIRONMENT: &str = "test";

/// Length of the random ID returned by [`unique_id`].
pub const UNIQUE_ID_LEN: usize = 6;

/// Terraform variable carrying the environment label.
pub const VAR_ENVIRONMENT: &str = "environment";

/// Terraform variable carrying the resource suffix.
pub const VAR_RESOURCE_SUFFIX: &str = "resource_suffix";

/// Returns a short random ID drawn from `[0-9A-Za-z]`.
///
/// Six base-62 characters give ~56 billion combinations, enough to keep
/// concurrent runs in one account from colliding.
#[must_use]
pub fn unique_id() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(UNIQUE_ID_LEN)
        .map(char::from)
        .collect()
}

/// One provisioning of the module: an environment plus a resource suffix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestRun {
    environment: String,
    resource_suffix: String,
}

impl TestRun {
    /// Create a run with a freshly generated `-test-<id>` suffix.
    ///
    /// # Errors
    ///
    /// Returns [`RunError::EmptyEnvironment`] if `environment` is blank.
    pub fn generate(environment: &str) -> Result<Self, RunError> {
        let suffix = format!("{SUFFIX_MARKER}{}", unique_id().to_lowercase());
        Self::with_suffix(environment, &suffix)
    }

    /// Create a run with an explicit suffix, e.g. to tear down a run that
    /// was left behind.
    ///
    /// # Errors
    ///
    /// Returns an error if the environment is blank or the suffix is empty
    /// or contains characters outside `[a-z0-9-]`.
    pub fn with_suffix(environment: &str, suffix: &str) -> Result<Self, RunError> {
        if environment.trim().is_empty() {
            return Err(RunError::EmptyEnvironment);
        }
        validate_suffix(suffix)?;
        Ok(Self {
            environment: environment.to_string(),
            resource_suffix: suffix.to_string(),
        })
    }

    #[must_use]
    pub fn environment(&self) -> &str {
        &self.environment
    }

    #[must_use]
    pub fn resource_suffix(&self) -> &str {
        &self.resource_suffix
    }

    /// Terraform variables for this run.
    #[must_use]
    pub fn vars(&self) -> BTreeMap<String, String> {
        BTreeMap::from([
            (VAR_ENVIRONMENT.to_string(), self.environment.clone()),
            (VAR_RESOURCE_SUFFIX.to_string(), self.resource_suffix.clone()),
        ])
    }

    /// The function name the module must report for this run.
    #[must_use]
    pub fn expected_function_name(&self) -> String {
        format!("{FUNCTION_NAME_PREFIX}{}", self.resource_suffix)
    }

    /// Byte-for-byte comparison of `actual` against the expected name.
    ///
    /// # Errors
    ///
    /// Returns [`RunError::NameMismatch`] carrying both values.
    pub fn verify_function_name(&self, actual: &str) -> Result<(), RunError> {
        let expected = self.expected_function_name();
        if actual.as_bytes() == expected.as_bytes() {
            Ok(())
        } else {
            Err(RunError::NameMismatch {
                expected,
                actual: actual.to_string(),
            })
        }
    }
}

/// Validates a resource suffix: non-empty, lowercase ASCII letters, digits
/// and hyphens only.
///
/// # Errors
///
/// Returns [`RunError::InvalidSuffix`] on violation.
pub fn validate_suffix(suffix: &str) -> Result<(), RunError> {
    let valid = !suffix.is_empty()
        && suffix
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
    if valid {
        Ok(())
    } else {
        Err(RunError::InvalidSuffix(suffix.to_string()))
    }
}

/// Summary of a scenario that provisioned, verified and destroyed cleanly.
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioReport {
    pub environment: String,
    pub resource_suffix: String,
    pub function_name: String,
    /// Wall time of `init` + `apply`.
    pub apply_secs: f64,
    pub destroy_secs: f64,
}
