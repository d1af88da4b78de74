//! Charm-style prompts using cliclack

use crate::error::{Result, ToolsError};
use crate::interaction::{PresetAnswers, Prompter, SelectItem};
use std::io;

/// Prompts on the terminal, skipping any prompt already answered by a preset
#[derive(Debug, Clone, Default)]
pub struct CliclackPrompter {
    presets: PresetAnswers,
}

impl CliclackPrompter {
    pub fn new(presets: PresetAnswers) -> Self {
        Self { presets }
    }
}

/// Ctrl-C / Esc dismisses the prompt; anything else is a terminal failure
fn dismissed<T>(result: io::Result<T>) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) if e.kind() == io::ErrorKind::Interrupted => Ok(None),
        Err(e) => Err(ToolsError::Interaction(e)),
    }
}

impl Prompter for CliclackPrompter {
    fn input(
        &mut self,
        key: &str,
        message: &str,
        default: &str,
        validate: fn(&str) -> Option<&'static str>,
    ) -> Result<Option<String>> {
        if let Some(answer) = self.presets.input(key, validate) {
            return answer.map(Some);
        }

        dismissed(
            cliclack::input(message)
                .default_input(default)
                .placeholder(default)
                .validate(move |value: &String| match validate(value) {
                    Some(problem) => Err(problem),
                    None => Ok(()),
                })
                .interact::<String>(),
        )
    }

    fn select(
        &mut self,
        key: &str,
        message: &str,
        items: &[SelectItem],
    ) -> Result<Option<&'static str>> {
        if let Some(answer) = self.presets.select(key, items) {
            return answer.map(Some);
        }

        let mut prompt = cliclack::select(message);
        for item in items {
            prompt = prompt.item(item.value, &item.label, &item.hint);
        }
        dismissed(prompt.interact())
    }

    fn confirm(&mut self, key: &str, message: &str, default: bool) -> Result<Option<bool>> {
        if let Some(answer) = self.presets.confirm(key) {
            return answer.map(Some);
        }

        dismissed(cliclack::confirm(message).initial_value(default).interact())
    }
}
