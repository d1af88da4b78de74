//! Thin invokers over the Expo CLI (doctor, build, web deploy)

pub mod commands;
pub mod outcome;

pub use commands::{Artifact, BuildRequest, BuildType, DeployTarget, Platform, DIAGNOSTIC_COMMAND};
pub use outcome::{build_succeeded, deploy_succeeded, doctor_verdict, DoctorVerdict};

use crate::error::Result;
use crate::runtime::shell::{CommandResult, CommandRunner};
use std::path::{Path, PathBuf};

/// Runs Expo CLI commands in one project root
pub struct ExpoCli<'r, R> {
    runner: &'r R,
    project_root: PathBuf,
}

impl<'r, R: CommandRunner> ExpoCli<'r, R> {
    pub fn new(runner: &'r R, project_root: impl Into<PathBuf>) -> Self {
        Self {
            runner,
            project_root: project_root.into(),
        }
    }

    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    pub async fn run_diagnostic(&self) -> Result<CommandResult> {
        self.runner.run(DIAGNOSTIC_COMMAND, &self.project_root).await
    }

    pub async fn run_build(&self, request: &BuildRequest) -> Result<CommandResult> {
        self.runner.run(&request.command(), &self.project_root).await
    }

    pub async fn run_deploy(&self, target: DeployTarget) -> Result<CommandResult> {
        self.runner.run(target.command(), &self.project_root).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::FakeRunner;

    #[tokio::test]
    async fn test_invokers_run_in_project_root() {
        let runner = FakeRunner::default();
        let cli = ExpoCli::new(&runner, "/work/app");

        cli.run_diagnostic().await.unwrap();
        let request =
            BuildRequest::new(Platform::Ios, BuildType::Production, Some(Artifact::Archive))
                .unwrap();
        cli.run_build(&request).await.unwrap();
        cli.run_deploy(DeployTarget::Vercel).await.unwrap();

        let calls = runner.calls();
        let commands: Vec<&str> = calls.iter().map(|(c, _)| c.as_str()).collect();
        assert_eq!(
            commands,
            vec![
                "npx expo doctor",
                "npx expo build:ios --release-channel production --type archive",
                "npx vercel web-build",
            ]
        );
        assert!(calls.iter().all(|(_, dir)| dir == Path::new("/work/app")));
    }

    #[tokio::test]
    async fn test_invoker_returns_captured_output() {
        let runner = FakeRunner::default().respond("npx expo doctor", "All good", "");
        let cli = ExpoCli::new(&runner, "/work/app");
        let result = cli.run_diagnostic().await.unwrap();
        assert_eq!(result.stdout, "All good");
        assert_eq!(doctor_verdict(&result), DoctorVerdict::Clean);
    }
}
