//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain`; never from `crate::infra`,
//! `crate::commands`, or `crate::output`.

use std::path::PathBuf;
use std::process::Output;
use std::time::Duration;

use anyhow::Result;
use serde_json::Value;

use crate::domain::config::E2eConfig;
use crate::domain::terraform::TerraformOptions;

// ── Command Runner Port ───────────────────────────────────────────────────────

/// Abstracts process execution so infrastructure can be swapped or mocked.
#[allow(async_fn_in_trait)]
pub trait CommandRunner {
    /// Run a program and capture its output.
    ///
    /// Implementations should delegate to `run_with_timeout` using the
    /// instance's configured default timeout.
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output>;
    /// Run a program with a custom timeout override.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned or exceeds `timeout`.
    /// On timeout, the child process must be killed (not left orphaned).
    async fn run_with_timeout(
        &self,
        program: &str,
        args: &[&str],
        timeout: Duration,
    ) -> Result<Output>;
}

// ── Provisioning Ports ────────────────────────────────────────────────────────

/// Stack lifecycle: prepare, create, and remove infrastructure.
#[allow(async_fn_in_trait)]
pub trait StackLifecycle {
    /// Initialise the working directory (providers, modules, backend).
    async fn init(&self, opts: &TerraformOptions) -> Result<String>;
    /// Create or update the infrastructure described by `opts`.
    async fn apply(&self, opts: &TerraformOptions) -> Result<String>;
    /// Remove everything created by `apply`.
    async fn destroy(&self, opts: &TerraformOptions) -> Result<String>;
}

/// Reads named outputs of an applied stack.
#[allow(async_fn_in_trait)]
pub trait OutputReader {
    /// Return the value of output `name`.
    async fn output(&self, opts: &TerraformOptions, name: &str) -> Result<String>;
}

/// Composite trait: any type implementing both sub-traits is a `Provisioner`.
pub trait Provisioner: StackLifecycle + OutputReader {}

/// Blanket implementation: any type implementing both sub-traits is a `Provisioner`.
impl<T> Provisioner for T where T: StackLifecycle + OutputReader {}

// ── Joke Store Port ───────────────────────────────────────────────────────────

/// Key-value read access to the jokes table.
#[allow(async_fn_in_trait)]
pub trait JokeStore {
    /// Fetch the item stored under `key` in `table`; `None` when absent.
    async fn get_item(&self, table: &str, key: &Value) -> Result<Option<Value>>;
}

// ── Config Port ───────────────────────────────────────────────────────────────

/// Abstracts configuration loading.
pub trait ConfigStore {
    /// Load the configuration, falling back to defaults when no file exists.
    fn load(&self) -> Result<E2eConfig>;
    /// Path the configuration is read from.
    fn path(&self) -> Result<PathBuf>;
}

// ── Progress Reporting Port ───────────────────────────────────────────────────

/// Abstracts progress reporting so services can emit events without
/// depending on the Presentation layer. Sync trait, no async needed.
pub trait ProgressReporter {
    /// Emit an in-progress step message.
    fn step(&self, message: &str);
    /// Emit a success message.
    fn success(&self, message: &str);
    /// Emit a warning message.
    fn warn(&self, message: &str);
}
