//! Terminal prompts and output using cliclack (Charm-style inline prompts)
//!
//! This module is optional and only available when the `tui` feature is enabled.

#[cfg(feature = "tui")]
mod output;
#[cfg(feature = "tui")]
mod prompts;

#[cfg(feature = "tui")]
pub use output::TerminalSink;
#[cfg(feature = "tui")]
pub use prompts::CliclackPrompter;
