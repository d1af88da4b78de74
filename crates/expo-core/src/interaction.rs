//! Interfaces to the interactive host: prompts in, status and log lines out
//!
//! Every prompt has a stable key so answers can be supplied up front (CLI
//! flags, scripts) instead of interactively. A prompt that yields `None` means
//! the user made no selection; the calling command then ends silently.

use crate::error::{Result, ToolsError};
use std::collections::HashMap;

/// Stable prompt keys
pub mod keys {
    pub const APP_NAME: &str = "name";
    pub const LOCATION: &str = "location";
    pub const OVERWRITE: &str = "overwrite";
    pub const INSTALL_DEPENDENCIES: &str = "install";
    pub const OPEN_PROJECT: &str = "open";
    pub const PLATFORM: &str = "platform";
    pub const BUILD_TYPE: &str = "build-type";
    pub const ARTIFACT: &str = "artifact";
    pub const DEPLOY: &str = "deploy";
    pub const DEPLOY_TARGET: &str = "deploy-target";
}

/// One choice of a single-select prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectItem {
    pub value: &'static str,
    pub label: String,
    pub hint: String,
}

impl SelectItem {
    pub fn new(value: &'static str, label: impl Into<String>, hint: impl Into<String>) -> Self {
        Self {
            value,
            label: label.into(),
            hint: hint.into(),
        }
    }
}

/// Source of user choices
pub trait Prompter {
    /// Free-text input; `validate` returns the problem with a candidate, if any
    fn input(
        &mut self,
        key: &str,
        message: &str,
        default: &str,
        validate: fn(&str) -> Option<&'static str>,
    ) -> Result<Option<String>>;

    /// Single choice; returns the chosen item's value
    fn select(
        &mut self,
        key: &str,
        message: &str,
        items: &[SelectItem],
    ) -> Result<Option<&'static str>>;

    /// Yes/no question
    fn confirm(&mut self, key: &str, message: &str, default: bool) -> Result<Option<bool>>;
}

/// Severity of a transient status message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// Append-only output log plus transient status/progress messages
pub trait OutputSink {
    fn append_line(&mut self, line: &str);
    fn status(&mut self, level: StatusLevel, message: &str);
    fn progress(&mut self, message: &str);
}

/// Answers supplied before any prompt is shown
#[derive(Debug, Clone, Default)]
pub struct PresetAnswers {
    answers: HashMap<String, String>,
    assume_yes: bool,
}

impl PresetAnswers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer every confirmation without a preset with "yes"
    pub fn assume_yes(mut self, yes: bool) -> Self {
        self.assume_yes = yes;
        self
    }

    pub fn with(mut self, key: &str, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: &str, value: impl Into<String>) {
        self.answers.insert(key.to_string(), value.into());
    }

    pub fn is_empty(&self) -> bool {
        self.answers.is_empty() && !self.assume_yes
    }

    pub fn input(
        &self,
        key: &str,
        validate: fn(&str) -> Option<&'static str>,
    ) -> Option<Result<String>> {
        let value = self.answers.get(key)?;
        Some(match validate(value) {
            Some(problem) => Err(ToolsError::Validation(format!(
                "Invalid value for --{}: {}",
                key, problem
            ))),
            None => Ok(value.clone()),
        })
    }

    pub fn select(&self, key: &str, items: &[SelectItem]) -> Option<Result<&'static str>> {
        let value = self.answers.get(key)?;
        let chosen = items.iter().find(|item| {
            item.value.eq_ignore_ascii_case(value) || item.label.eq_ignore_ascii_case(value)
        });
        Some(match chosen {
            Some(item) => Ok(item.value),
            None => Err(ToolsError::Validation(format!(
                "'{}' is not a valid choice for --{} (expected one of: {})",
                value,
                key,
                items.iter().map(|i| i.value).collect::<Vec<_>>().join(", ")
            ))),
        })
    }

    pub fn confirm(&self, key: &str) -> Option<Result<bool>> {
        match self.answers.get(key) {
            Some(value) => Some(parse_yes_no(value).ok_or_else(|| {
                ToolsError::Validation(format!(
                    "'{}' is not a valid answer for --{} (expected yes or no)",
                    value, key
                ))
            })),
            None if self.assume_yes => Some(Ok(true)),
            None => None,
        }
    }
}

fn parse_yes_no(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "y" | "yes" | "true" | "1" => Some(true),
        "n" | "no" | "false" | "0" => Some(false),
        _ => None,
    }
}

/// Non-interactive prompter: answers come only from presets, anything else is
/// treated as "no selection"
#[derive(Debug, Clone, Default)]
pub struct PresetPrompter {
    presets: PresetAnswers,
}

impl PresetPrompter {
    pub fn new(presets: PresetAnswers) -> Self {
        Self { presets }
    }
}

impl Prompter for PresetPrompter {
    fn input(
        &mut self,
        key: &str,
        _message: &str,
        _default: &str,
        validate: fn(&str) -> Option<&'static str>,
    ) -> Result<Option<String>> {
        self.presets.input(key, validate).transpose()
    }

    fn select(
        &mut self,
        key: &str,
        _message: &str,
        items: &[SelectItem],
    ) -> Result<Option<&'static str>> {
        self.presets.select(key, items).transpose()
    }

    fn confirm(&mut self, key: &str, _message: &str, _default: bool) -> Result<Option<bool>> {
        self.presets.confirm(key).transpose()
    }
}
