//! Terminal rendering of command output

use crate::interaction::{OutputSink, StatusLevel};
use colored::Colorize;
use console::Term;

/// Output log on stdout, status and progress as cliclack log lines
#[derive(Debug, Clone)]
pub struct TerminalSink {
    term: Term,
}

impl Default for TerminalSink {
    fn default() -> Self {
        Self {
            term: Term::stdout(),
        }
    }
}

impl TerminalSink {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Section headings and verdict lines are all-caps
fn is_heading(line: &str) -> bool {
    line.chars().any(|c| c.is_ascii_alphabetic())
        && !line.chars().any(|c| c.is_ascii_lowercase())
}

fn render(line: &str) -> String {
    if !is_heading(line) {
        return line.to_string();
    }

    if line.contains("FAILED") || line.contains("ERROR") {
        line.red().bold().to_string()
    } else if line.contains("SUCCESSFULLY") {
        line.green().bold().to_string()
    } else {
        line.bold().to_string()
    }
}

impl OutputSink for TerminalSink {
    fn append_line(&mut self, line: &str) {
        if let Err(e) = self.term.write_line(&render(line)) {
            tracing::debug!(error = %e, "failed to write output line");
        }
    }

    fn status(&mut self, level: StatusLevel, message: &str) {
        let written = match level {
            StatusLevel::Info => cliclack::log::info(message),
            StatusLevel::Success => cliclack::log::success(message),
            StatusLevel::Warning => cliclack::log::warning(message),
            StatusLevel::Error => cliclack::log::error(message),
        };
        if let Err(e) = written {
            tracing::debug!(error = %e, "failed to write status");
        }
    }

    fn progress(&mut self, message: &str) {
        if let Err(e) = cliclack::log::step(message) {
            tracing::debug!(error = %e, "failed to write progress");
        }
    }
}
