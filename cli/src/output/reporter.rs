//! `TerminalReporter` — Presentation-layer implementation of `ProgressReporter`.
//!
//! Wraps `&OutputContext` and implements the `application::ports::ProgressReporter`
//! trait so application services can emit progress events without depending on
//! any presentation type directly.

use std::sync::Mutex;

use indicatif::ProgressBar;
use owo_colors::OwoColorize as _;

use crate::application::ports::ProgressReporter;
use crate::output::{OutputContext, progress};

/// Terminal progress reporter that wraps an `OutputContext`.
///
/// On a TTY each `step()` runs as a spinner until the next event replaces it.
/// Otherwise events are plain lines:
///
/// - `step()` prints `"  → {message}"` (suppressed when `ctx.quiet`)
/// - `success()` prints `"  ✓ {message}"` (suppressed when `ctx.quiet`)
/// - `warn()` prints `"  ! {message}"` (suppressed when `ctx.quiet`)
pub struct TerminalReporter<'a> {
    ctx: &'a OutputContext,
    active: Mutex<Option<(ProgressBar, String)>>,
}

impl<'a> TerminalReporter<'a> {
    /// Create a new `TerminalReporter` wrapping the given output context.
    #[must_use]
    pub fn new(ctx: &'a OutputContext) -> Self {
        Self {
            ctx,
            active: Mutex::new(None),
        }
    }

    /// Print a line without corrupting an active spinner.
    pub fn println(&self, line: &str) {
        match self.active.lock() {
            Ok(guard) => match guard.as_ref() {
                Some((pb, _)) => pb.suspend(|| println!("{line}")),
                None => println!("{line}"),
            },
            Err(_) => println!("{line}"),
        }
    }

    /// Like [`Self::println`] but on stderr.
    pub fn eprintln(&self, line: &str) {
        match self.active.lock() {
            Ok(guard) => match guard.as_ref() {
                Some((pb, _)) => pb.suspend(|| eprintln!("{line}")),
                None => eprintln!("{line}"),
            },
            Err(_) => eprintln!("{line}"),
        }
    }

    /// Stop the active spinner, leaving its step message on screen.
    pub fn finish(&self) {
        self.replace_spinner(None);
    }

    fn replace_spinner(&self, next: Option<(ProgressBar, String)>) {
        if let Ok(mut guard) = self.active.lock() {
            if let Some((pb, message)) = guard.take() {
                progress::finish_with(&pb, &"→".style(self.ctx.styles.step).to_string(), &message);
            }
            *guard = next;
        }
    }
}

impl ProgressReporter for TerminalReporter<'_> {
    fn step(&self, message: &str) {
        if self.ctx.quiet {
            return;
        }
        if self.ctx.show_progress() {
            self.replace_spinner(Some((progress::spinner(message), message.to_string())));
        } else {
            println!("  {} {message}", "→".style(self.ctx.styles.step));
        }
    }

    fn success(&self, message: &str) {
        if self.ctx.quiet {
            return;
        }
        self.replace_spinner(None);
        println!("  {} {message}", "✓".style(self.ctx.styles.success));
    }

    fn warn(&self, message: &str) {
        if self.ctx.quiet {
            return;
        }
        self.replace_spinner(None);
        println!("  {} {message}", "!".style(self.ctx.styles.warning));
    }
}

impl Drop for TerminalReporter<'_> {
    fn drop(&mut self) {
        self.finish();
    }
}
