//! External tool plumbing
//!
//! This module provides:
//! - The shell executor every external command goes through
//! - Prerequisite detection for Node.js, npm and git
//! - Minimum-version checks

pub mod check;
pub mod shell;
pub mod version;

pub use check::{
    check_git, check_node, check_npm, probe_all, require_tool, RuntimeInfo, Tool,
};
pub use shell::{quote_arg, CommandResult, CommandRunner, HostShell, ShellExecutor};
