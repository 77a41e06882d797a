//! Typed domain error enums.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, or `std::process`.
//! All error types implement `thiserror::Error` and convert to `anyhow::Error`
//! via the `?` operator.

use thiserror::Error;

// ── Run errors ────────────────────────────────────────────────────────────────

/// Errors raised while building or verifying a test run.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RunError {
    #[error("Expected function name to be {expected}, got {actual}")]
    NameMismatch { expected: String, actual: String },

    #[error("Invalid resource suffix '{0}': must be non-empty and match [a-z0-9-]+")]
    InvalidSuffix(String),

    #[error("Environment name must not be empty.")]
    EmptyEnvironment,
}

// ── Terraform errors ──────────────────────────────────────────────────────────

/// Errors surfaced by the Terraform adapter.
#[derive(Debug, Error)]
pub enum TerraformError {
    #[error("terraform {subcommand} failed (exit code {code}):\n{output}")]
    CommandFailed {
        subcommand: String,
        code: String,
        output: String,
    },

    #[error("terraform {subcommand} still failing after {attempts} attempts ({reason}):\n{output}")]
    RetriesExhausted {
        subcommand: String,
        attempts: u32,
        reason: String,
        output: String,
    },

    #[error("Invalid retryable error pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("terraform output '{0}' is empty")]
    EmptyOutput(String),

    #[error("terraform output '{name}' is not valid JSON: {reason}")]
    MalformedOutput { name: String, reason: String },
}

// ── Joke errors ───────────────────────────────────────────────────────────────

/// Errors related to the jokester lookup.
#[derive(Debug, Error)]
pub enum JokeError {
    #[error("DynamoDB get-item on table '{table}' failed:\n{stderr}")]
    LookupFailed { table: String, stderr: String },

    #[error("Unexpected get-item response: {0}")]
    MalformedResponse(String),
}

// ── Config errors ─────────────────────────────────────────────────────────────

/// Errors related to configuration values.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value}\n\n{hint}")]
    InvalidValue {
        key: String,
        value: String,
        hint: String,
    },
}
