//! `TerminalSink` — relays build output to the terminal as it arrives.

use std::sync::atomic::{AtomicBool, Ordering};

use owo_colors::OwoColorize as _;

use crate::application::ports::OutputSink;
use crate::domain::StreamKind;
use crate::output::OutputContext;
use crate::output::reporter::TerminalReporter;

/// Writes primary build lines to stdout and diagnostics, dimmed, to stderr.
/// Suppressed entirely when quiet; failures still carry the diagnostic tail.
///
/// The first line is preceded by a rule; [`TerminalSink::close`] prints the
/// matching rule once the build is over.
pub struct TerminalSink<'a> {
    reporter: &'a TerminalReporter<'a>,
    quiet: bool,
    dim: owo_colors::Style,
    opened: AtomicBool,
}

impl<'a> TerminalSink<'a> {
    #[must_use]
    pub fn new(reporter: &'a TerminalReporter<'a>, ctx: &OutputContext) -> Self {
        Self {
            reporter,
            quiet: ctx.quiet,
            dim: ctx.styles.dim,
            opened: AtomicBool::new(false),
        }
    }

    /// Print the closing rule if any output was relayed.
    pub fn close(&self) {
        if self.opened.swap(false, Ordering::SeqCst) {
            self.reporter.println(&self.rule());
        }
    }

    fn rule(&self) -> String {
        format!("  {}", "─".repeat(41).style(self.dim))
    }
}

impl OutputSink for TerminalSink<'_> {
    fn line(&self, stream: StreamKind, line: &str) {
        if self.quiet {
            return;
        }
        if !self.opened.swap(true, Ordering::SeqCst) {
            self.reporter.println(&self.rule());
        }
        match stream {
            StreamKind::Primary => self.reporter.println(&format!("    {line}")),
            StreamKind::Diagnostic => self
                .reporter
                .eprintln(&format!("    {}", line.style(self.dim))),
        }
    }
}
