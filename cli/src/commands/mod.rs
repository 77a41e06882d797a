//! Command implementations

pub mod apply;
pub mod config;
pub mod destroy;
pub mod joke;
pub mod output;
pub mod run;
pub mod suffix;
pub mod version;

use clap::Args;

/// Environment and suffix selecting one provisioning of the module.
#[derive(Args, Debug, Clone)]
pub struct TargetArgs {
    /// Environment label (defaults to the configured environment)
    #[arg(long, short = 'e')]
    pub environment: Option<String>,

    /// Resource suffix, e.g. `-test-abc123`
    #[arg(long, short = 's')]
    pub suffix: Option<String>,
}
