//! `TerminalReporter`: Presentation-layer implementation of `ProgressReporter`.
//!
//! Wraps `&OutputContext` and implements the `application::ports::ProgressReporter`
//! trait so application services can emit progress events without depending on
//! any presentation type directly.

use indicatif::ProgressBar;

use crate::application::ports::ProgressReporter;
use crate::output::{Mark, OutputContext, progress};

/// Terminal progress reporter that wraps an `OutputContext`.
///
/// On a TTY the current step drives a spinner and finished steps are printed
/// above it. Otherwise every event is a plain status line. Nothing is
/// printed when `ctx.quiet`.
pub struct TerminalReporter<'a> {
    ctx: &'a OutputContext,
    spinner: Option<ProgressBar>,
}

impl<'a> TerminalReporter<'a> {
    #[must_use]
    pub fn new(ctx: &'a OutputContext) -> Self {
        let spinner = ctx.show_progress().then(|| progress::spinner("starting"));
        Self { ctx, spinner }
    }

    /// Stop the spinner, if any.
    pub fn finish(&self, ok: bool) {
        if let Some(pb) = &self.spinner {
            if ok {
                progress::finish_success(pb, "done");
            } else {
                progress::finish_error(pb, "failed");
            }
        }
    }

    /// The line an event prints, or `None` when it prints nothing.
    fn event_line(&self, mark: Mark, message: &str) -> Option<String> {
        if self.ctx.quiet || (mark == Mark::Step && self.spinner.is_some()) {
            return None;
        }
        Some(self.ctx.render(mark, message))
    }

    fn emit(&self, mark: Mark, message: &str) {
        let Some(text) = self.event_line(mark, message) else {
            return;
        };
        match &self.spinner {
            Some(pb) => pb.println(text),
            None => println!("{text}"),
        }
    }
}

impl ProgressReporter for TerminalReporter<'_> {
    fn step(&self, message: &str) {
        if let Some(pb) = &self.spinner {
            pb.set_message(message.to_string());
        }
        self.emit(Mark::Step, message);
    }

    fn success(&self, message: &str) {
        self.emit(Mark::Pass, message);
    }

    fn warn(&self, message: &str) {
        self.emit(Mark::Warn, message);
    }
}

/// Reporter that discards every event; used in `--json` mode.
pub struct SilentReporter;

impl ProgressReporter for SilentReporter {
    fn step(&self, _message: &str) {}
    fn success(&self, _message: &str) {}
    fn warn(&self, message: &str) {
        tracing::warn!("{message}");
    }
}
