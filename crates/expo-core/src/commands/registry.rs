//! Command ids and dispatch

use super::{build, create, doctor, CommandOutcome, Session};
use crate::error::{Result, ToolsError};
use crate::interaction::StatusLevel;
use crate::runtime::shell::CommandRunner;
use std::future::Future;
use std::pin::Pin;

pub const CREATE_NEW_APP: &str = "expo-tools.createNewApp";
pub const BUILD_AND_DEPLOY: &str = "expo-tools.buildAndDeploy";
pub const RUN_DOCTOR: &str = "expo-tools.runDoctor";

pub type CommandFuture<'a> = Pin<Box<dyn Future<Output = Result<CommandOutcome>> + 'a>>;

/// Entry point of one command
pub type CommandHandler<R> = for<'a> fn(&'a mut Session<R>) -> CommandFuture<'a>;

pub struct RegisteredCommand<R> {
    pub id: &'static str,
    pub title: &'static str,
    handler: CommandHandler<R>,
}

/// Lookup table from command id to handler
pub struct CommandRegistry<R> {
    commands: Vec<RegisteredCommand<R>>,
}

impl<R> Default for CommandRegistry<R> {
    fn default() -> Self {
        Self {
            commands: Vec::new(),
        }
    }
}

fn create_handler<R: CommandRunner + 'static>(session: &mut Session<R>) -> CommandFuture<'_> {
    Box::pin(create::create_new_app(session))
}

fn build_handler<R: CommandRunner + 'static>(session: &mut Session<R>) -> CommandFuture<'_> {
    Box::pin(build::build_and_deploy(session))
}

fn doctor_handler<R: CommandRunner + 'static>(session: &mut Session<R>) -> CommandFuture<'_> {
    Box::pin(doctor::run_doctor(session))
}

impl<R: CommandRunner + 'static> CommandRegistry<R> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the create, build and doctor commands
    pub fn with_builtin_commands() -> Self {
        let mut registry = Self::new();
        registry.register(CREATE_NEW_APP, "Create New Expo App", create_handler::<R>);
        registry.register(BUILD_AND_DEPLOY, "Build and Deploy Expo App", build_handler::<R>);
        registry.register(RUN_DOCTOR, "Run Expo Doctor", doctor_handler::<R>);
        registry
    }

    /// Register a handler, replacing any handler with the same id
    pub fn register(&mut self, id: &'static str, title: &'static str, handler: CommandHandler<R>) {
        self.commands.retain(|c| c.id != id);
        self.commands.push(RegisteredCommand { id, title, handler });
    }

    pub fn get(&self, id: &str) -> Option<&RegisteredCommand<R>> {
        self.commands.iter().find(|c| c.id == id)
    }

    pub fn commands(&self) -> impl Iterator<Item = &RegisteredCommand<R>> {
        self.commands.iter()
    }

    /// Run the command registered under `id`.
    ///
    /// Handler errors are reported to the session's output and become
    /// [`CommandOutcome::Failed`]; only an unknown id is returned as an error.
    pub async fn dispatch(&self, id: &str, session: &mut Session<R>) -> Result<CommandOutcome> {
        let command = self
            .get(id)
            .ok_or_else(|| ToolsError::Validation(format!("Unknown command: {}", id)))?;

        tracing::debug!(id, "dispatching command");
        match (command.handler)(session).await {
            Ok(outcome) => {
                tracing::debug!(id, ?outcome, "command finished");
                Ok(outcome)
            }
            Err(e) => {
                tracing::error!(id, kind = e.kind(), error = %e, "command failed");
                session
                    .sink
                    .append_line(&format!("{} failed: {}", command.title, e));
                session
                    .sink
                    .status(StatusLevel::Error, &format!("Error: {}", e));
                Ok(CommandOutcome::Failed)
            }
        }
    }
}
