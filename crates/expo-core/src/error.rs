//! Error taxonomy shared by every operation in the crate

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by scaffolding, building and diagnosing operations
#[derive(Debug, Error)]
pub enum ToolsError {
    /// Bad user input (app name, build options, pre-answered prompts)
    #[error("{0}")]
    Validation(String),

    /// No project root is available to run the operation in
    #[error("No workspace is open. Please open a workspace first.")]
    NoWorkspace,

    /// Template fetch failure (unreachable remote, auth failure, HTTP error)
    #[error("Failed to fetch template from {url}: {message}")]
    Network { url: String, message: String },

    /// Filesystem copy/remove/create failure
    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },

    /// Manifest or configuration file that exists but cannot be parsed
    #[error("Invalid configuration in {}: {message}", path.display())]
    Config { path: PathBuf, message: String },

    /// External command exited non-zero or could not be spawned
    #[error("Command failed: {command}\n{message}")]
    Execution { command: String, message: String },

    /// The prompt terminal itself failed
    #[error("Prompt failed: {0}")]
    Interaction(#[source] io::Error),
}

impl ToolsError {
    /// Short category name, stable for logs and tests
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::NoWorkspace => "no-workspace",
            Self::Network { .. } => "network",
            Self::Io { .. } => "io",
            Self::Config { .. } => "config",
            Self::Execution { .. } => "execution",
            Self::Interaction(_) => "interaction",
        }
    }

    pub(crate) fn io(context: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    pub(crate) fn execution(command: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Execution {
            command: command.into(),
            message: message.into(),
        }
    }

    pub(crate) fn config(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        Self::Config {
            path: path.into(),
            message: message.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ToolsError>;
