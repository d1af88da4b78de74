//! Fakes shared by the unit tests

use crate::commands::Session;
use crate::config::ToolsConfig;
use crate::error::{Result, ToolsError};
use crate::interaction::{OutputSink, PresetAnswers, PresetPrompter, StatusLevel};
use crate::runtime::shell::{CommandResult, CommandRunner};
use crate::scaffold::progress::{ProgressObserver, ScaffoldPhase};
use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// Command runner that records calls instead of spawning processes.
///
/// `git clone` calls materialize the configured template files (plus a `.git`
/// directory) at the clone destination, which is the last quoted argument.
#[derive(Default)]
pub(crate) struct FakeRunner {
    calls: RefCell<Vec<(String, PathBuf)>>,
    template: Vec<(String, String)>,
    fail_all: Option<String>,
    failures: Vec<(String, String)>,
    responses: Vec<(String, CommandResult)>,
}

impl FakeRunner {
    pub(crate) fn cloning(files: &[(&str, &str)]) -> Self {
        Self {
            template: files
                .iter()
                .map(|(path, content)| (path.to_string(), content.to_string()))
                .collect(),
            ..Self::default()
        }
    }

    pub(crate) fn failing(message: &str) -> Self {
        Self {
            fail_all: Some(message.to_string()),
            ..Self::default()
        }
    }

    /// Fail commands starting with `prefix`
    pub(crate) fn fail_on(mut self, prefix: &str, message: &str) -> Self {
        self.failures.push((prefix.to_string(), message.to_string()));
        self
    }

    /// Answer commands starting with `prefix` with the given output
    pub(crate) fn respond(mut self, prefix: &str, stdout: &str, stderr: &str) -> Self {
        self.responses
            .push((prefix.to_string(), CommandResult::new(stdout, stderr)));
        self
    }

    pub(crate) fn calls(&self) -> Vec<(String, PathBuf)> {
        self.calls.borrow().clone()
    }

    fn materialize_clone(&self, command: &str) -> Result<()> {
        let destination = command
            .chars()
            .last()
            .filter(|quote| *quote == '\'' || *quote == '"')
            .and_then(|quote| {
                let body = &command[..command.len() - 1];
                body.rfind(quote).map(|start| PathBuf::from(&body[start + 1..]))
            })
            .ok_or_else(|| ToolsError::execution(command, "no clone destination"))?;

        let write = |path: &Path, content: &str| -> std::io::Result<()> {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, content)
        };

        for (relative, content) in &self.template {
            write(&destination.join(relative), content)
                .map_err(|e| ToolsError::io("fake clone", e))?;
        }
        write(&destination.join(".git/HEAD"), "ref: refs/heads/main\n")
            .map_err(|e| ToolsError::io("fake clone", e))
    }
}

impl CommandRunner for FakeRunner {
    async fn run(&self, command: &str, working_dir: &Path) -> Result<CommandResult> {
        self.calls
            .borrow_mut()
            .push((command.to_string(), working_dir.to_path_buf()));

        if let Some(message) = &self.fail_all {
            return Err(ToolsError::execution(command, message.clone()));
        }

        if let Some((_, message)) = self.failures.iter().find(|(p, _)| command.starts_with(p)) {
            return Err(ToolsError::execution(command, message.clone()));
        }

        if command.starts_with("git clone") {
            self.materialize_clone(command)?;
        }

        Ok(self
            .responses
            .iter()
            .find(|(p, _)| command.starts_with(p))
            .map(|(_, result)| result.clone())
            .unwrap_or_default())
    }
}

/// Observer that keeps everything it is told
#[derive(Debug, Default)]
pub(crate) struct RecordingObserver {
    pub(crate) phases: Vec<ScaffoldPhase>,
    /// Install outcomes, `true` for success
    pub(crate) installs: Vec<bool>,
    /// Error kinds
    pub(crate) errors: Vec<&'static str>,
}

impl ProgressObserver for RecordingObserver {
    fn on_phase(&mut self, phase: ScaffoldPhase) {
        self.phases.push(phase);
    }

    fn on_install(&mut self, result: &Result<CommandResult>) {
        self.installs.push(result.is_ok());
    }

    fn on_error(&mut self, error: &ToolsError) {
        self.errors.push(error.kind());
    }
}

#[derive(Debug, Default)]
struct SinkLog {
    lines: Vec<String>,
    statuses: Vec<(StatusLevel, String)>,
    progress: Vec<String>,
}

/// Output sink whose clones share one log, so a test can keep a handle after
/// moving the sink into a session
#[derive(Debug, Clone, Default)]
pub(crate) struct RecordingSink {
    log: Rc<RefCell<SinkLog>>,
}

impl RecordingSink {
    pub(crate) fn lines(&self) -> Vec<String> {
        self.log.borrow().lines.clone()
    }

    pub(crate) fn statuses(&self) -> Vec<(StatusLevel, String)> {
        self.log.borrow().statuses.clone()
    }

    pub(crate) fn progress_messages(&self) -> Vec<String> {
        self.log.borrow().progress.clone()
    }

    pub(crate) fn has_line(&self, line: &str) -> bool {
        self.log.borrow().lines.iter().any(|l| l == line)
    }

    pub(crate) fn last_status(&self) -> Option<(StatusLevel, String)> {
        self.log.borrow().statuses.last().cloned()
    }
}

impl OutputSink for RecordingSink {
    fn append_line(&mut self, line: &str) {
        self.log.borrow_mut().lines.push(line.to_string());
    }

    fn status(&mut self, level: StatusLevel, message: &str) {
        self.log
            .borrow_mut()
            .statuses
            .push((level, message.to_string()));
    }

    fn progress(&mut self, message: &str) {
        self.log.borrow_mut().progress.push(message.to_string());
    }
}

/// Session over a fake runner with preset answers and a recording sink
pub(crate) fn session(
    runner: FakeRunner,
    presets: PresetAnswers,
    workspace: Option<&Path>,
) -> (Session<FakeRunner>, RecordingSink) {
    let sink = RecordingSink::default();
    let session = Session::new(
        runner,
        Box::new(PresetPrompter::new(presets)),
        Box::new(sink.clone()),
        ToolsConfig::default(),
        workspace.map(Path::to_path_buf),
    );
    (session, sink)
}
