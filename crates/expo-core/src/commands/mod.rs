//! User-facing commands and the state they run against
//!
//! Each command collects choices through the session's [`Prompter`], runs one
//! operation, and renders the result to the session's [`OutputSink`].

pub mod build;
pub mod create;
pub mod doctor;
pub mod registry;
pub mod workspace;

pub use registry::{
    CommandFuture, CommandHandler, CommandRegistry, RegisteredCommand, BUILD_AND_DEPLOY,
    CREATE_NEW_APP, RUN_DOCTOR,
};
pub use workspace::{prepare_target_folder, TargetFolder};

use crate::config::ToolsConfig;
use crate::error::{Result, ToolsError};
use crate::interaction::{OutputSink, Prompter, StatusLevel};
use crate::runtime::shell::CommandResult;
use crate::scaffold::progress::{ProgressObserver, ScaffoldPhase};
use std::path::PathBuf;

/// How a command ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    Completed,
    /// A prompt got no selection or the user declined
    Cancelled,
    /// The failure has already been reported to the output sink
    Failed,
}

/// Everything a command needs: runner, host interaction, config, project root
pub struct Session<R> {
    pub runner: R,
    pub prompter: Box<dyn Prompter>,
    pub sink: Box<dyn OutputSink>,
    pub config: ToolsConfig,
    /// First open project root, if any
    pub workspace: Option<PathBuf>,
}

impl<R> Session<R> {
    pub fn new(
        runner: R,
        prompter: Box<dyn Prompter>,
        sink: Box<dyn OutputSink>,
        config: ToolsConfig,
        workspace: Option<PathBuf>,
    ) -> Self {
        Self {
            runner,
            prompter,
            sink,
            config,
            workspace,
        }
    }

    /// The project root commands run in, made absolute against the current
    /// directory
    pub fn workspace_root(&self) -> Result<PathBuf> {
        let dir = self
            .workspace
            .as_ref()
            .filter(|dir| dir.is_dir())
            .ok_or(ToolsError::NoWorkspace)?;
        std::path::absolute(dir)
            .map_err(|e| ToolsError::io(format!("Failed to resolve {}", dir.display()), e))
    }
}

/// Append stderr and stdout of a finished command under headings
fn write_output_sections(
    sink: &mut dyn OutputSink,
    stderr_heading: &str,
    stdout_heading: &str,
    result: &CommandResult,
) {
    if !result.stderr.is_empty() {
        sink.append_line("");
        sink.append_line(stderr_heading);
        sink.append_line(result.stderr.trim_end());
    }

    if !result.stdout.is_empty() {
        sink.append_line("");
        sink.append_line(stdout_heading);
        sink.append_line(result.stdout.trim_end());
    }
}

/// Renders scaffold progress to an output sink
pub struct SinkProgress<'a> {
    sink: &'a mut dyn OutputSink,
}

impl<'a> SinkProgress<'a> {
    pub fn new(sink: &'a mut dyn OutputSink) -> Self {
        Self { sink }
    }
}

impl ProgressObserver for SinkProgress<'_> {
    fn on_phase(&mut self, phase: ScaffoldPhase) {
        if !phase.is_terminal() && phase != ScaffoldPhase::Idle {
            self.sink.progress(phase.message());
        }
    }

    fn on_install(&mut self, result: &Result<CommandResult>) {
        match result {
            Ok(_) => self
                .sink
                .status(StatusLevel::Success, "Dependencies installed successfully!"),
            Err(e) => {
                let message = format!("Failed to install dependencies: {}", e);
                self.sink.append_line(&message);
                self.sink.status(StatusLevel::Error, &message);
            }
        }
    }

    fn on_error(&mut self, error: &ToolsError) {
        let message = format!("Error creating Expo template: {}", error);
        self.sink.append_line(&message);
        self.sink.status(StatusLevel::Error, &message);
    }
}
