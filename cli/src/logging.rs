//! Tracing subscriber setup.
//!
//! Logs go to stderr so stdout stays parseable in `--json` mode.
//! `RUST_LOG` wins over the `-v` count when set.

use tracing_subscriber::EnvFilter;

/// Default filter directive for a given `-v` count.
#[must_use]
pub fn default_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Install the global subscriber. Subsequent calls are no-ops.
pub fn init(verbosity: u8) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity))),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
