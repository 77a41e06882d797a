//! Domain layer: pure types, validation, and argument building.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, or `std::process`.
//! All functions are synchronous and take data in, returning data out.

pub mod config;
pub mod error;
pub mod joke;
pub mod run;
pub mod terraform;

pub use config::E2eConfig;
pub use error::{ConfigError, JokeError, RunError, TerraformError};
pub use run::{ScenarioReport, TestRun};
pub use terraform::{Subcommand, TerraformOptions};
