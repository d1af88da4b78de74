//! Expo Core - Shared library for scaffolding, building and diagnosing Expo apps
//!
//! This library provides the operations behind the `expo-tools` CLI: creating a
//! project from the Expo template, invoking Expo CLI builds and deployments,
//! and running `expo doctor`. Terminal front ends plug in through the
//! [`Prompter`] and [`OutputSink`] traits.
//!
//! # Architecture
//!
//! The library is organized into layers:
//!
//! - **Layer 1: Core Operations** - Shell execution, tool probing, template
//!   acquisition, tree copying, manifest customization
//! - **Layer 2: Workflow Orchestration** - [`ScaffoldPipeline`] and the Expo CLI
//!   invokers with their output classification
//! - **Layer 3: Commands** - Prompt-driven flows behind a [`CommandRegistry`],
//!   plus optional cliclack adapters (feature-gated)
//!
//! # Feature Flags
//!
//! - `tui` (default): Enables the cliclack-based prompter and terminal sink
//!
//! # Example Usage (without TUI)
//!
//! ```ignore
//! use expo_core::{ScaffoldPipeline, ScaffoldRequest, ShellExecutor, ToolsConfig};
//! use expo_core::scaffold::NoProgress;
//!
//! let runner = ShellExecutor::default();
//! let config = ToolsConfig::default();
//! let pipeline = ScaffoldPipeline::from_config(&runner, &config)?;
//! let request = ScaffoldRequest::new("My App", "/work/My App", true)?;
//! let created = pipeline.scaffold(request, &mut NoProgress).await;
//! ```

pub mod commands;
pub mod config;
pub mod error;
pub mod expo;
pub mod interaction;
pub mod runtime;
pub mod scaffold;
pub mod templates;

#[cfg(feature = "tui")]
pub mod tui;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export main types for convenience
pub use commands::{CommandOutcome, CommandRegistry, Session};
pub use config::ToolsConfig;
pub use error::{Result, ToolsError};
pub use interaction::{OutputSink, PresetAnswers, PresetPrompter, Prompter, StatusLevel};
pub use runtime::{CommandResult, CommandRunner, ShellExecutor};
pub use scaffold::{ScaffoldPipeline, ScaffoldRequest};
pub use templates::{TemplateAcquirer, TemplateSource};

#[cfg(feature = "tui")]
pub use tui::{CliclackPrompter, TerminalSink};
