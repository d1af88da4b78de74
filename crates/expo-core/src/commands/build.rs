//! `expo-tools.buildAndDeploy`

use super::{write_output_sections, CommandOutcome, Session};
use crate::error::{Result, ToolsError};
use crate::expo::{
    build_succeeded, deploy_succeeded, Artifact, BuildRequest, BuildType, DeployTarget, ExpoCli,
    Platform,
};
use crate::interaction::{keys, StatusLevel};
use crate::runtime::shell::CommandRunner;
use std::path::Path;

fn choice<T>(value: &str, parse: fn(&str) -> Option<T>) -> Result<T> {
    parse(value).ok_or_else(|| ToolsError::Validation(format!("Unknown choice '{}'", value)))
}

/// Pick platform, release channel and artifact, run the build, and for web
/// builds offer a deployment
pub async fn build_and_deploy<R: CommandRunner>(session: &mut Session<R>) -> Result<CommandOutcome> {
    let root = session.workspace_root()?;

    let Some(platform) =
        session
            .prompter
            .select(keys::PLATFORM, "Select platform to build for", &Platform::select_items())?
    else {
        return Ok(CommandOutcome::Cancelled);
    };
    let platform = choice(platform, Platform::from_value)?;

    let Some(build_type) =
        session
            .prompter
            .select(keys::BUILD_TYPE, "Select build type", &BuildType::select_items())?
    else {
        return Ok(CommandOutcome::Cancelled);
    };
    let build_type = choice(build_type, BuildType::from_value)?;

    session.sink.append_line(&format!(
        "Starting Expo build for {} ({})...",
        platform, build_type
    ));
    session.sink.progress("Preparing build environment...");

    let artifact = if platform.artifacts().is_empty() {
        None
    } else {
        let Some(artifact) = session.prompter.select(
            keys::ARTIFACT,
            &format!("Select {} build type", platform.label()),
            &Artifact::select_items(platform),
        )?
        else {
            return Ok(CommandOutcome::Cancelled);
        };
        Some(choice(artifact, Artifact::from_value)?)
    };

    let request = BuildRequest::new(platform, build_type, artifact)?;
    session.sink.progress("Building project...");
    session
        .sink
        .append_line(&format!("Executing: {}", request.command()));

    let result = match ExpoCli::new(&session.runner, &root)
        .run_build(&request)
        .await
    {
        Ok(result) => result,
        Err(e) => {
            tracing::error!(error = %e, "build command failed");
            session.sink.append_line("");
            session.sink.append_line("BUILD PROCESS ERROR:");
            session.sink.append_line(&e.to_string());
            session
                .sink
                .status(StatusLevel::Error, &format!("Build failed: {}", e));
            return Ok(CommandOutcome::Failed);
        }
    };

    write_output_sections(
        session.sink.as_mut(),
        "BUILD WARNINGS/ERRORS:",
        "BUILD OUTPUT:",
        &result,
    );

    if !build_succeeded(&result) {
        session.sink.append_line("");
        session.sink.append_line("BUILD FAILED");
        session.sink.status(
            StatusLevel::Error,
            &format!("Expo {} build failed. Check the output for details.", platform),
        );
        return Ok(CommandOutcome::Failed);
    }

    session.sink.append_line("");
    session.sink.append_line("BUILD COMPLETED SUCCESSFULLY");
    session.sink.status(
        StatusLevel::Success,
        &format!("Expo {} build completed successfully!", platform),
    );

    if platform != Platform::Web {
        session.sink.status(
            StatusLevel::Info,
            &format!(
                "Your {} build has completed. Follow the Expo CLI instructions for next steps.",
                platform
            ),
        );
        return Ok(CommandOutcome::Completed);
    }

    let deploy = session
        .prompter
        .confirm(keys::DEPLOY, "Would you like to deploy this web build?", false)?;
    if deploy == Some(true) {
        return deploy_web(session, &root).await;
    }

    Ok(CommandOutcome::Completed)
}

async fn deploy_web<R: CommandRunner>(
    session: &mut Session<R>,
    root: &Path,
) -> Result<CommandOutcome> {
    let Some(target) = session.prompter.select(
        keys::DEPLOY_TARGET,
        "Select deployment target",
        &DeployTarget::select_items(),
    )?
    else {
        return Ok(CommandOutcome::Cancelled);
    };
    let target = choice(target, DeployTarget::from_value)?;

    session.sink.append_line("");
    session
        .sink
        .append_line(&format!("Preparing deployment to {}...", target));
    session
        .sink
        .append_line(&format!("Executing: {}", target.command()));

    let result = match ExpoCli::new(&session.runner, root).run_deploy(target).await {
        Ok(result) => result,
        Err(e) => {
            tracing::error!(error = %e, target = %target, "deploy command failed");
            session.sink.append_line("");
            session.sink.append_line("DEPLOYMENT PROCESS ERROR:");
            session.sink.append_line(&e.to_string());
            session
                .sink
                .status(StatusLevel::Error, &format!("Deployment failed: {}", e));
            return Ok(CommandOutcome::Failed);
        }
    };

    write_output_sections(
        session.sink.as_mut(),
        "DEPLOYMENT WARNINGS/ERRORS:",
        "DEPLOYMENT OUTPUT:",
        &result,
    );

    session.sink.append_line("");
    if deploy_succeeded(&result) {
        session.sink.append_line("DEPLOYMENT COMPLETED SUCCESSFULLY");
        session.sink.status(
            StatusLevel::Success,
            &format!("Deployment to {} completed successfully!", target),
        );
        Ok(CommandOutcome::Completed)
    } else {
        session.sink.append_line("DEPLOYMENT FAILED");
        session.sink.status(
            StatusLevel::Error,
            &format!("Deployment to {} failed. Check the output for details.", target),
        );
        Ok(CommandOutcome::Failed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interaction::PresetAnswers;
    use crate::test_support::{session, FakeRunner};

    fn ios_production() -> PresetAnswers {
        PresetAnswers::new()
            .with(keys::PLATFORM, "ios")
            .with(keys::BUILD_TYPE, "production")
            .with(keys::ARTIFACT, "archive")
    }

    #[tokio::test]
    async fn test_ios_build_success() {
        let project = tempfile::tempdir().unwrap();
        let runner = FakeRunner::default().respond("npx expo build:ios", "Build finished", "warn");
        let (mut s, sink) = session(runner, ios_production(), Some(project.path()));

        assert_eq!(build_and_deploy(&mut s).await.unwrap(), CommandOutcome::Completed);

        assert_eq!(
            s.runner.calls(),
            vec![(
                "npx expo build:ios --release-channel production --type archive".to_string(),
                project.path().to_path_buf()
            )]
        );
        assert!(sink.has_line("BUILD WARNINGS/ERRORS:"));
        assert!(sink.has_line("BUILD COMPLETED SUCCESSFULLY"));
        assert!(sink.statuses().contains(&(
            StatusLevel::Success,
            "Expo ios build completed successfully!".to_string()
        )));
        assert_eq!(
            sink.last_status().unwrap().1,
            "Your ios build has completed. Follow the Expo CLI instructions for next steps."
        );
    }

    #[tokio::test]
    async fn test_stderr_without_marker_fails_build() {
        let project = tempfile::tempdir().unwrap();
        let runner = FakeRunner::default().respond("npx expo build:ios", "Compiling", "boom");
        let (mut s, sink) = session(runner, ios_production(), Some(project.path()));

        assert_eq!(build_and_deploy(&mut s).await.unwrap(), CommandOutcome::Failed);
        assert!(sink.has_line("BUILD FAILED"));
        assert_eq!(
            sink.last_status(),
            Some((
                StatusLevel::Error,
                "Expo ios build failed. Check the output for details.".to_string()
            ))
        );
    }

    #[tokio::test]
    async fn test_build_command_error_is_reported() {
        let project = tempfile::tempdir().unwrap();
        let runner = FakeRunner::default().fail_on("npx expo build", "exit code 1");
        let (mut s, sink) = session(runner, ios_production(), Some(project.path()));

        assert_eq!(build_and_deploy(&mut s).await.unwrap(), CommandOutcome::Failed);
        assert!(sink.has_line("BUILD PROCESS ERROR:"));
        assert!(sink.last_status().unwrap().1.starts_with("Build failed:"));
    }

    #[tokio::test]
    async fn test_dismissed_artifact_runs_nothing() {
        let project = tempfile::tempdir().unwrap();
        let presets = PresetAnswers::new()
            .with(keys::PLATFORM, "android")
            .with(keys::BUILD_TYPE, "preview");
        let (mut s, _) = session(FakeRunner::default(), presets, Some(project.path()));

        assert_eq!(build_and_deploy(&mut s).await.unwrap(), CommandOutcome::Cancelled);
        assert!(s.runner.calls().is_empty());
    }

    #[tokio::test]
    async fn test_web_build_and_deploy() {
        let project = tempfile::tempdir().unwrap();
        let presets = PresetAnswers::new()
            .with(keys::PLATFORM, "web")
            .with(keys::BUILD_TYPE, "development")
            .with(keys::DEPLOY, "yes")
            .with(keys::DEPLOY_TARGET, "Netlify");
        let runner = FakeRunner::default().respond("npx netlify", "Site deployed", "notice");
        let (mut s, sink) = session(runner, presets, Some(project.path()));

        assert_eq!(build_and_deploy(&mut s).await.unwrap(), CommandOutcome::Completed);

        let commands: Vec<String> = s.runner.calls().into_iter().map(|(c, _)| c).collect();
        assert_eq!(
            commands,
            vec!["npx expo build:web --dev", "npx netlify deploy --dir=web-build"]
        );
        assert!(sink.has_line("DEPLOYMENT WARNINGS/ERRORS:"));
        assert!(sink.has_line("DEPLOYMENT COMPLETED SUCCESSFULLY"));
        assert_eq!(
            sink.last_status(),
            Some((
                StatusLevel::Success,
                "Deployment to Netlify completed successfully!".to_string()
            ))
        );
    }

    #[tokio::test]
    async fn test_web_deploy_declined() {
        let project = tempfile::tempdir().unwrap();
        let presets = PresetAnswers::new()
            .with(keys::PLATFORM, "web")
            .with(keys::BUILD_TYPE, "production")
            .with(keys::DEPLOY, "no");
        let (mut s, _) = session(FakeRunner::default(), presets, Some(project.path()));

        assert_eq!(build_and_deploy(&mut s).await.unwrap(), CommandOutcome::Completed);
        assert_eq!(s.runner.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_deploy_failure_classification() {
        let project = tempfile::tempdir().unwrap();
        let presets = PresetAnswers::new()
            .with(keys::PLATFORM, "web")
            .with(keys::BUILD_TYPE, "production")
            .with(keys::DEPLOY, "yes")
            .with(keys::DEPLOY_TARGET, "vercel");
        let runner = FakeRunner::default().respond("npx vercel", "Uploading", "Error: no token");
        let (mut s, sink) = session(runner, presets, Some(project.path()));

        assert_eq!(build_and_deploy(&mut s).await.unwrap(), CommandOutcome::Failed);
        assert!(sink.has_line("DEPLOYMENT FAILED"));
    }

    #[tokio::test]
    async fn test_requires_workspace() {
        let (mut s, _) = session(FakeRunner::default(), ios_production(), None);
        assert_eq!(build_and_deploy(&mut s).await.unwrap_err().kind(), "no-workspace");
    }
}
