//! Scaffold phase reporting

use crate::error::ToolsError;
use crate::runtime::shell::CommandResult;
use std::fmt;

/// Phases of one scaffold operation, in the order they are entered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScaffoldPhase {
    Idle,
    Acquiring,
    Copying,
    Customizing,
    Installing,
    Done,
    Failed,
}

impl ScaffoldPhase {
    /// Status text shown while the phase runs
    pub fn message(&self) -> &'static str {
        match self {
            ScaffoldPhase::Idle => "Preparing...",
            ScaffoldPhase::Acquiring => "Downloading template...",
            ScaffoldPhase::Copying => "Copying template files...",
            ScaffoldPhase::Customizing => "Customizing project...",
            ScaffoldPhase::Installing => "Installing dependencies...",
            ScaffoldPhase::Done => "Done",
            ScaffoldPhase::Failed => "Failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, ScaffoldPhase::Done | ScaffoldPhase::Failed)
    }
}

impl fmt::Display for ScaffoldPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}

/// Receives phase changes from the scaffolding pipeline
pub trait ProgressObserver {
    fn on_phase(&mut self, phase: ScaffoldPhase);

    /// Outcome of the best-effort dependency install
    fn on_install(&mut self, _result: &Result<CommandResult, ToolsError>) {}

    /// The error that moved the pipeline to [`ScaffoldPhase::Failed`]
    fn on_error(&mut self, _error: &ToolsError) {}
}

/// Observer that ignores everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressObserver for NoProgress {
    fn on_phase(&mut self, _phase: ScaffoldPhase) {}
}
