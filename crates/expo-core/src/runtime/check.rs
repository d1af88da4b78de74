//! Prerequisite detection for Node.js, npm and git

use crate::error::{Result, ToolsError};
use crate::runtime::shell::CommandRunner;
use crate::runtime::version::{check_minimum, MIN_NODE_VERSION};
use std::fmt;
use std::path::Path;
use std::process::Command;

/// External tools the commands depend on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tool {
    Node,
    Npm,
    Git,
}

impl Tool {
    pub fn display_name(&self) -> &'static str {
        match self {
            Tool::Node => "Node.js",
            Tool::Npm => "npm",
            Tool::Git => "git",
        }
    }

    /// Binary name on the current host (npm ships as a .cmd shim on Windows)
    pub fn binary(&self) -> &'static str {
        match self {
            Tool::Node => "node",
            Tool::Npm if cfg!(windows) => "npm.cmd",
            Tool::Npm => "npm",
            Tool::Git => "git",
        }
    }

    pub fn install_hint(&self) -> &'static str {
        match self {
            Tool::Node | Tool::Npm => "install from https://nodejs.org",
            Tool::Git => "install from https://git-scm.com",
        }
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Tool detection result
#[derive(Debug, Clone)]
pub struct RuntimeInfo {
    pub name: &'static str,
    pub version: Option<String>,
    pub available: bool,
    /// Advisory message, e.g. an outdated version
    pub warning: Option<String>,
}

impl RuntimeInfo {
    /// One-line summary used in the output log
    pub fn summary(&self) -> String {
        match (&self.version, self.available) {
            (Some(v), true) => format!("{} ({})", self.name, v),
            (None, true) => format!("{} (unknown version)", self.name),
            _ => format!("{} (not installed)", self.name),
        }
    }
}

fn probe(tool: Tool) -> RuntimeInfo {
    let output = Command::new(tool.binary()).arg("--version").output();

    match output {
        Ok(out) if out.status.success() => {
            let version = String::from_utf8_lossy(&out.stdout).trim().to_string();
            let warning = match tool {
                Tool::Node => check_minimum(tool.display_name(), &version, MIN_NODE_VERSION),
                _ => None,
            };
            RuntimeInfo {
                name: tool.display_name(),
                version: Some(version),
                available: true,
                warning,
            }
        }
        _ => RuntimeInfo {
            name: tool.display_name(),
            version: None,
            available: false,
            warning: None,
        },
    }
}

/// Check if Node.js is available
pub fn check_node() -> RuntimeInfo {
    probe(Tool::Node)
}

/// Check if npm is available
pub fn check_npm() -> RuntimeInfo {
    probe(Tool::Npm)
}

/// Check if git is available
pub fn check_git() -> RuntimeInfo {
    probe(Tool::Git)
}

/// Probe every tool, reporting availability without failing
pub fn probe_all(tools: &[Tool]) -> Vec<RuntimeInfo> {
    tools.iter().map(|t| probe(*t)).collect()
}

/// Fail early unless `<tool> --version` runs through `runner`
pub async fn require_tool<R: CommandRunner>(
    runner: &R,
    tool: Tool,
    working_dir: &Path,
) -> Result<()> {
    let command = format!("{} --version", tool.binary());
    let available = match runner.run(&command, working_dir).await {
        Ok(_) => true,
        Err(e) => {
            tracing::debug!(error = %e, tool = %tool, "required tool unavailable");
            false
        }
    };
    let info = RuntimeInfo {
        name: tool.display_name(),
        version: None,
        available,
        warning: None,
    };
    missing_tools_error(&[tool], &[info])
}

fn missing_tools_error(tools: &[Tool], results: &[RuntimeInfo]) -> Result<()> {
    let missing: Vec<String> = tools
        .iter()
        .zip(results)
        .filter(|(_, info)| !info.available)
        .map(|(tool, _)| format!("  - {} ({})", tool, tool.install_hint()))
        .collect();

    if missing.is_empty() {
        return Ok(());
    }

    Err(ToolsError::execution(
        tools
            .iter()
            .map(Tool::binary)
            .collect::<Vec<_>>()
            .join(", "),
        format!("Missing required tools:\n{}", missing.join("\n")),
    ))
}
