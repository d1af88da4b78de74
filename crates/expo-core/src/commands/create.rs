//! `expo-tools.createNewApp`

use super::workspace::{prepare_target_folder, TargetFolder};
use super::{CommandOutcome, Session, SinkProgress};
use crate::config::TemplateSourceKind;
use crate::error::Result;
use crate::interaction::{keys, SelectItem, StatusLevel};
use crate::runtime::check::{require_tool, Tool};
use crate::runtime::shell::CommandRunner;
use crate::scaffold::{app_name_problem, ScaffoldPipeline, ScaffoldRequest};

pub const DEFAULT_APP_NAME: &str = "MyExpoApp";

const NEW_FOLDER: &str = "new-folder";
const CURRENT_FOLDER: &str = "current-folder";

fn location_items() -> Vec<SelectItem> {
    vec![
        SelectItem::new(NEW_FOLDER, "Create in new folder", "Creates <workspace>/<app name>"),
        SelectItem::new(CURRENT_FOLDER, "Create in current folder", "Uses the workspace root"),
    ]
}

fn canceled<R>(session: &mut Session<R>) -> Result<CommandOutcome> {
    session
        .sink
        .status(StatusLevel::Info, "App creation canceled");
    Ok(CommandOutcome::Cancelled)
}

/// Ask for a name and location, scaffold the template there, then offer to
/// open the new project
pub async fn create_new_app<R: CommandRunner>(session: &mut Session<R>) -> Result<CommandOutcome> {
    let app_name = match session.prompter.input(
        keys::APP_NAME,
        "Enter your Expo application name",
        DEFAULT_APP_NAME,
        app_name_problem,
    )? {
        Some(name) if !name.is_empty() => name,
        _ => return canceled(session),
    };

    let Some(location) =
        session
            .prompter
            .select(keys::LOCATION, "Choose where to create the app", &location_items())?
    else {
        return canceled(session);
    };

    let root = session.workspace_root()?;
    if session.config.template.source == TemplateSourceKind::Git {
        require_tool(&session.runner, Tool::Git, &root).await?;
    }

    // Validated before anything on disk changes
    let new_folder = location == NEW_FOLDER;
    let target = if new_folder {
        root.join(&app_name)
    } else {
        root.clone()
    };
    let request = ScaffoldRequest::new(&app_name, &target, false)?;

    if new_folder {
        match prepare_target_folder(&root, &app_name, session.prompter.as_mut()).await? {
            TargetFolder::Ready(_) => {}
            TargetFolder::Cancelled => return canceled(session),
        }
    }

    let install = session
        .prompter
        .confirm(
            keys::INSTALL_DEPENDENCIES,
            "Would you like to install dependencies now?",
            true,
        )?
        .unwrap_or(false);
    let request = request.with_install(install);

    session
        .sink
        .status(StatusLevel::Info, &format!("Creating new Expo app: {}", app_name));

    let pipeline = ScaffoldPipeline::from_config(&session.runner, &session.config)?;
    let created = {
        let mut progress = SinkProgress::new(session.sink.as_mut());
        pipeline.scaffold(request, &mut progress).await
    };
    if !created {
        return Ok(CommandOutcome::Failed);
    }

    session.sink.status(
        StatusLevel::Success,
        &format!("Successfully created Expo app: {}", app_name),
    );
    session
        .sink
        .append_line(&format!("Project created at {}", target.display()));

    let open_project = session.prompter.confirm(
        keys::OPEN_PROJECT,
        &format!("Would you like to open {}?", app_name),
        false,
    )?;
    if open_project == Some(true) {
        if let Err(e) = open::that(&target) {
            tracing::warn!(error = %e, "failed to open project folder");
            session.sink.status(
                StatusLevel::Warning,
                &format!("Could not open {}: {}", target.display(), e),
            );
        }
    }

    Ok(CommandOutcome::Completed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interaction::PresetAnswers;
    use crate::test_support::{session, FakeRunner};
    use std::path::{Path, PathBuf};

    fn template_dir() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("app.json"),
            r#"{"expo": {"name": "template", "slug": "template"}}"#,
        )
        .unwrap();
        std::fs::write(
            dir.path().join("package.json"),
            r#"{"name": "template", "description": "tpl"}"#,
        )
        .unwrap();
        dir
    }

    fn answers(name: &str) -> PresetAnswers {
        PresetAnswers::new()
            .with(keys::APP_NAME, name)
            .with(keys::LOCATION, NEW_FOLDER)
            .with(keys::INSTALL_DEPENDENCIES, "no")
            .with(keys::OPEN_PROJECT, "no")
    }

    #[tokio::test]
    async fn test_create_in_new_folder() {
        let workspace = tempfile::tempdir().unwrap();
        let templates = template_dir();
        let temp_root = tempfile::tempdir().unwrap();
        let (mut s, sink) = session(
            FakeRunner::default(),
            answers("My App"),
            Some(workspace.path()),
        );
        s.config.use_local_templates(templates.path().to_path_buf());
        s.config.temp_root = Some(temp_root.path().to_path_buf());

        let outcome = create_new_app(&mut s).await.unwrap();
        assert_eq!(outcome, CommandOutcome::Completed);

        let app = std::fs::read_to_string(workspace.path().join("My App/app.json")).unwrap();
        assert!(app.contains("\"slug\": \"my-app\""));
        assert_eq!(
            sink.last_status(),
            Some((StatusLevel::Success, "Successfully created Expo app: My App".to_string()))
        );
        assert!(sink
            .progress_messages()
            .contains(&"Customizing project...".to_string()));
        assert!(s.runner.calls().is_empty());
    }

    #[tokio::test]
    async fn test_create_in_current_folder_with_install() {
        let workspace = tempfile::tempdir().unwrap();
        let templates = template_dir();
        let temp_root = tempfile::tempdir().unwrap();
        let presets = answers("demo")
            .with(keys::LOCATION, "Create in current folder")
            .with(keys::INSTALL_DEPENDENCIES, "yes");
        let (mut s, sink) = session(FakeRunner::default(), presets, Some(workspace.path()));
        s.config.use_local_templates(templates.path().to_path_buf());
        s.config.temp_root = Some(temp_root.path().to_path_buf());

        assert_eq!(create_new_app(&mut s).await.unwrap(), CommandOutcome::Completed);

        assert!(workspace.path().join("package.json").is_file());
        assert_eq!(
            s.runner.calls(),
            vec![("npm install".to_string(), workspace.path().to_path_buf())]
        );
        assert!(sink
            .statuses()
            .contains(&(StatusLevel::Success, "Dependencies installed successfully!".to_string())));
    }

    #[tokio::test]
    async fn test_dismissed_name_prompt_cancels() {
        let workspace = tempfile::tempdir().unwrap();
        let (mut s, sink) = session(
            FakeRunner::default(),
            PresetAnswers::new(),
            Some(workspace.path()),
        );

        assert_eq!(create_new_app(&mut s).await.unwrap(), CommandOutcome::Cancelled);
        assert_eq!(
            sink.last_status(),
            Some((StatusLevel::Info, "App creation canceled".to_string()))
        );
        assert!(std::fs::read_dir(workspace.path()).unwrap().next().is_none());
    }

    #[tokio::test]
    async fn test_declined_overwrite_leaves_folder_untouched() {
        let workspace = tempfile::tempdir().unwrap();
        std::fs::create_dir(workspace.path().join("demo")).unwrap();
        std::fs::write(workspace.path().join("demo/notes.txt"), "keep").unwrap();
        let presets = answers("demo").with(keys::OVERWRITE, "no");
        let (mut s, sink) = session(FakeRunner::default(), presets, Some(workspace.path()));

        assert_eq!(create_new_app(&mut s).await.unwrap(), CommandOutcome::Cancelled);
        assert_eq!(
            std::fs::read_to_string(workspace.path().join("demo/notes.txt")).unwrap(),
            "keep"
        );
        assert_eq!(
            sink.last_status(),
            Some((StatusLevel::Info, "App creation canceled".to_string()))
        );
        assert_eq!(
            s.runner.calls(),
            vec![("git --version".to_string(), workspace.path().to_path_buf())]
        );
    }

    #[tokio::test]
    async fn test_missing_git_leaves_existing_folder_untouched() {
        let workspace = tempfile::tempdir().unwrap();
        std::fs::create_dir(workspace.path().join("demo")).unwrap();
        std::fs::write(workspace.path().join("demo/notes.txt"), "keep").unwrap();
        let presets = answers("demo").with(keys::OVERWRITE, "yes");
        let runner = FakeRunner::default().fail_on("git --version", "not found");
        let (mut s, _) = session(runner, presets, Some(workspace.path()));

        let err = create_new_app(&mut s).await.unwrap_err();
        assert_eq!(err.kind(), "execution");
        assert_eq!(
            std::fs::read_to_string(workspace.path().join("demo/notes.txt")).unwrap(),
            "keep"
        );
        assert!(!s.runner.calls().iter().any(|(cmd, _)| cmd.starts_with("git clone")));
    }

    #[tokio::test]
    async fn test_relative_workspace_creates_app() {
        let workspace = tempfile::Builder::new()
            .prefix("relative-ws-")
            .tempdir_in(".")
            .unwrap();
        let relative = PathBuf::from(workspace.path().file_name().unwrap());
        let templates = template_dir();
        let temp_root = tempfile::tempdir().unwrap();
        let (mut s, sink) = session(
            FakeRunner::default(),
            answers("demo"),
            Some(relative.as_path()),
        );
        s.config.use_local_templates(templates.path().to_path_buf());
        s.config.temp_root = Some(temp_root.path().to_path_buf());

        assert_eq!(create_new_app(&mut s).await.unwrap(), CommandOutcome::Completed);
        assert!(workspace.path().join("demo/app.json").is_file());
        let created = sink
            .lines()
            .into_iter()
            .find(|line| line.starts_with("Project created at "))
            .unwrap();
        assert!(Path::new(created.trim_start_matches("Project created at ")).is_absolute());
    }

    #[tokio::test]
    async fn test_invalid_preset_name_is_validation_error() {
        let workspace = tempfile::tempdir().unwrap();
        let (mut s, _) = session(
            FakeRunner::default(),
            answers("bad/name"),
            Some(workspace.path()),
        );

        let err = create_new_app(&mut s).await.unwrap_err();
        assert_eq!(err.kind(), "validation");
    }

    #[tokio::test]
    async fn test_requires_workspace() {
        let (mut s, _) = session(FakeRunner::default(), answers("demo"), None::<&Path>);
        let err = create_new_app(&mut s).await.unwrap_err();
        assert_eq!(err.kind(), "no-workspace");
    }

    #[tokio::test]
    async fn test_failed_scaffold_reports_error() {
        let workspace = tempfile::tempdir().unwrap();
        let temp_root = tempfile::tempdir().unwrap();
        let missing = workspace.path().join("no-templates-here");
        let (mut s, sink) = session(
            FakeRunner::default(),
            answers("demo"),
            Some(workspace.path()),
        );
        s.config.use_local_templates(missing);
        s.config.temp_root = Some(temp_root.path().to_path_buf());

        assert_eq!(create_new_app(&mut s).await.unwrap(), CommandOutcome::Failed);
        let (level, message) = sink.last_status().unwrap();
        assert_eq!(level, StatusLevel::Error);
        assert!(message.starts_with("Error creating Expo template:"));
        assert!(std::fs::read_dir(temp_root.path()).unwrap().next().is_none());
    }
}
