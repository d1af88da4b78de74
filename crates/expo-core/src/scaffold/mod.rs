//! Project scaffolding pipeline
//!
//! Sequences template acquisition, manifest customization and the optional
//! dependency install for one [`ScaffoldRequest`]:
//!
//! `Idle -> Acquiring -> Copying -> Customizing -> (Installing) -> Done | Failed`
//!
//! No phase is re-entered and nothing is retried.

pub mod progress;
pub mod request;

pub use progress::{NoProgress, ProgressObserver, ScaffoldPhase};
pub use request::{app_name_problem, validate_app_name, ScaffoldRequest};

use crate::config::ToolsConfig;
use crate::error::Result;
use crate::runtime::shell::CommandRunner;
use crate::templates::fetcher::TemplateAcquirer;
use crate::templates::manifest::customize_project;

/// Orchestrates one scaffold at a time
pub struct ScaffoldPipeline<'r, R> {
    runner: &'r R,
    acquirer: TemplateAcquirer<'r, R>,
    install_command: String,
}

impl<'r, R: CommandRunner> ScaffoldPipeline<'r, R> {
    pub fn new(runner: &'r R, acquirer: TemplateAcquirer<'r, R>, install_command: impl Into<String>) -> Self {
        Self {
            runner,
            acquirer,
            install_command: install_command.into(),
        }
    }

    pub fn from_config(runner: &'r R, config: &ToolsConfig) -> Result<Self> {
        let acquirer = TemplateAcquirer::from_config(runner, config)?;
        Ok(Self::new(runner, acquirer, config.install_command.clone()))
    }

    pub fn acquirer(&self) -> &TemplateAcquirer<'r, R> {
        &self.acquirer
    }

    /// Run the whole pipeline.
    ///
    /// Returns `true` when acquisition and customization both succeed. A failed
    /// dependency install is reported to the observer but does not make the
    /// scaffold fail, since the project files already exist.
    pub async fn scaffold(
        &self,
        request: ScaffoldRequest,
        observer: &mut dyn ProgressObserver,
    ) -> bool {
        observer.on_phase(ScaffoldPhase::Idle);

        match self.run(&request, observer).await {
            Ok(()) => {
                tracing::info!(
                    app = request.app_name(),
                    target = %request.target_directory().display(),
                    "scaffold complete"
                );
                observer.on_phase(ScaffoldPhase::Done);
                true
            }
            Err(e) => {
                tracing::error!(app = request.app_name(), error = %e, "scaffold failed");
                observer.on_error(&e);
                observer.on_phase(ScaffoldPhase::Failed);
                false
            }
        }
    }

    async fn run(
        &self,
        request: &ScaffoldRequest,
        observer: &mut dyn ProgressObserver,
    ) -> Result<()> {
        let target = request.target_directory();

        observer.on_phase(ScaffoldPhase::Acquiring);
        self.acquirer.acquire(target, observer).await?;

        observer.on_phase(ScaffoldPhase::Customizing);
        customize_project(target, request.app_name()).await?;

        if request.install_dependencies() {
            observer.on_phase(ScaffoldPhase::Installing);
            let result = self.runner.run(&self.install_command, target).await;
            if let Err(e) = &result {
                tracing::warn!(error = %e, "dependency install failed");
            }
            observer.on_install(&result);
        }

        Ok(())
    }
}
