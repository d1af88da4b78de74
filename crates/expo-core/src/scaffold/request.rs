//! Validated scaffold input

use crate::error::{Result, ToolsError};
use std::path::{Path, PathBuf};

/// Why an app name is rejected, if it is
pub fn app_name_problem(name: &str) -> Option<&'static str> {
    if name.trim().is_empty() {
        return Some("Please enter a valid name");
    }
    let allowed = |c: char| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c.is_whitespace();
    if !name.chars().all(allowed) {
        return Some(
            "Name should only contain alphanumeric characters, hyphens, underscores, and spaces",
        );
    }
    None
}

pub fn validate_app_name(name: &str) -> Result<()> {
    match app_name_problem(name) {
        Some(problem) => Err(ToolsError::Validation(format!(
            "Invalid app name '{}': {}",
            name, problem
        ))),
        None => Ok(()),
    }
}

/// Everything the pipeline needs for one scaffold
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScaffoldRequest {
    app_name: String,
    target_directory: PathBuf,
    install_dependencies: bool,
}

impl ScaffoldRequest {
    pub fn new(
        app_name: impl Into<String>,
        target_directory: impl Into<PathBuf>,
        install_dependencies: bool,
    ) -> Result<Self> {
        let app_name = app_name.into();
        validate_app_name(&app_name)?;

        let target_directory = target_directory.into();
        if !target_directory.is_absolute() {
            return Err(ToolsError::Validation(format!(
                "Target directory must be absolute: {}",
                target_directory.display()
            )));
        }

        Ok(Self {
            app_name,
            target_directory,
            install_dependencies,
        })
    }

    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    pub fn target_directory(&self) -> &Path {
        &self.target_directory
    }

    pub fn install_dependencies(&self) -> bool {
        self.install_dependencies
    }

    /// Same request with the install choice replaced
    pub fn with_install(mut self, install_dependencies: bool) -> Self {
        self.install_dependencies = install_dependencies;
        self
    }
}
