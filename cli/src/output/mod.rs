//! Terminal output for jokester-e2e commands.
//!
//! Every human-readable line is a [`Mark`] followed by a message. Commands
//! print through [`OutputContext::status`]; the progress reporter renders the
//! same lines above its spinner.

pub mod json;
pub mod progress;
pub mod reporter;
pub mod styles;

use console::Term;
use owo_colors::{OwoColorize as _, Style};
pub use reporter::TerminalReporter;
pub use styles::Styles;

/// Leading symbol of a status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mark {
    /// Terraform step in progress.
    Step,
    /// Step or scenario passed.
    Pass,
    /// Non-fatal problem, e.g. a teardown failure behind a scenario failure.
    Warn,
    /// Scenario failed. Printed to stderr even when quiet.
    Fail,
    /// Follow-up the user may want to run.
    Hint,
}

impl Mark {
    fn symbol(self) -> &'static str {
        match self {
            Self::Step => "→",
            Self::Pass => "✓",
            Self::Warn => "⚠",
            Self::Fail => "✗",
            Self::Hint => "ℹ",
        }
    }

    fn style(self, styles: &Styles) -> Style {
        match self {
            Self::Step => styles.step,
            Self::Pass => styles.success,
            Self::Warn => styles.warning,
            Self::Fail => styles.error,
            Self::Hint => styles.info,
        }
    }
}

/// Styling and terminal state shared by all commands.
pub struct OutputContext {
    pub styles: Styles,
    /// Whether stdout is a TTY.
    pub is_tty: bool,
    /// Suppress everything except failures.
    pub quiet: bool,
}

impl OutputContext {
    /// `no_color` already folds in `NO_COLOR`; colours are also off when
    /// stdout is not a terminal.
    #[must_use]
    pub fn new(no_color: bool, quiet: bool) -> Self {
        let is_tty = Term::stdout().is_term();
        let mut styles = Styles::default();
        if !no_color && is_tty {
            styles.colorize();
        }
        Self {
            styles,
            is_tty,
            quiet,
        }
    }

    /// Spinners only make sense on an interactive, non-quiet terminal.
    #[must_use]
    pub fn show_progress(&self) -> bool {
        self.is_tty && !self.quiet
    }

    /// Render `msg` behind its mark, without printing.
    #[must_use]
    pub fn render(&self, mark: Mark, msg: &str) -> String {
        format!("  {} {msg}", mark.symbol().style(mark.style(&self.styles)))
    }

    /// Print a status line. `Fail` goes to stderr and ignores `quiet`.
    pub fn status(&self, mark: Mark, msg: &str) {
        if mark == Mark::Fail {
            eprintln!("{}", self.render(mark, msg));
        } else if !self.quiet {
            println!("{}", self.render(mark, msg));
        }
    }

    pub fn header(&self, msg: &str) {
        if !self.quiet {
            println!("  {}", msg.style(self.styles.header));
        }
    }

    /// Key in dim style, used for the suffix/function summary.
    pub fn kv(&self, key: &str, value: &str) {
        if !self.quiet {
            println!("  {}  {value}", key.style(self.styles.dim));
        }
    }
}
