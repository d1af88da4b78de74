//! `expo-tools.runDoctor`

use super::{write_output_sections, CommandOutcome, Session};
use crate::error::Result;
use crate::expo::{doctor_verdict, DoctorVerdict, ExpoCli};
use crate::interaction::StatusLevel;
use crate::runtime::check::{probe_all, Tool};
use crate::runtime::shell::CommandRunner;

/// Report local tooling, then run `npx expo doctor` in the project root
pub async fn run_doctor<R: CommandRunner>(session: &mut Session<R>) -> Result<CommandOutcome> {
    let root = session.workspace_root()?;

    session.sink.append_line("Running Expo doctor...");
    for info in probe_all(&[Tool::Node, Tool::Npm, Tool::Git]) {
        session.sink.append_line(&format!("  {}", info.summary()));
        if let Some(warning) = &info.warning {
            session.sink.status(StatusLevel::Warning, warning);
        }
    }

    session.sink.progress("Checking project configuration...");
    let result = match ExpoCli::new(&session.runner, &root).run_diagnostic().await {
        Ok(result) => result,
        Err(e) => {
            tracing::error!(error = %e, "expo doctor failed");
            session.sink.append_line("");
            session.sink.append_line("FAILED TO RUN EXPO DOCTOR:");
            session.sink.append_line(&e.to_string());
            session
                .sink
                .status(StatusLevel::Error, &format!("Failed to run Expo doctor: {}", e));
            return Ok(CommandOutcome::Failed);
        }
    };

    write_output_sections(session.sink.as_mut(), "ERRORS:", "RESULT:", &result);

    match doctor_verdict(&result) {
        DoctorVerdict::Clean => session.sink.status(
            StatusLevel::Info,
            "Expo diagnostics completed. See output for details.",
        ),
        DoctorVerdict::Issues => session.sink.status(
            StatusLevel::Warning,
            "Expo diagnostics completed with issues. See output for details.",
        ),
    }

    Ok(CommandOutcome::Completed)
}
