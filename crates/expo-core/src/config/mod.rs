//! Tool configuration
//!
//! Defaults can be overridden by an `expo-tools.yaml` file in the workspace root
//! (or an explicit path), then by environment variables.

use crate::error::{Result, ToolsError};
use crate::runtime::shell::DEFAULT_MAX_OUTPUT_BYTES;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Config file looked up in the workspace root
pub const CONFIG_FILE_NAME: &str = "expo-tools.yaml";

/// Environment variable overriding the template URL
pub const TEMPLATE_URL_ENV: &str = "EXPO_TOOLS_TEMPLATE_URL";

/// Environment variable overriding the template source kind
pub const TEMPLATE_SOURCE_ENV: &str = "EXPO_TOOLS_TEMPLATE_SOURCE";

pub const DEFAULT_TEMPLATE_URL: &str = "https://github.com/expo/expo-template-default";

pub const DEFAULT_TEMPLATE_ARCHIVE_URL: &str =
    "https://github.com/expo/expo-template-default/archive/refs/heads/main.zip";

pub const DEFAULT_INSTALL_COMMAND: &str = "npm install";

/// Where project templates come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateSourceKind {
    /// `git clone` of the template repository
    #[default]
    Git,
    /// Zip archive downloaded over HTTP
    Archive,
    /// Directory on the local filesystem
    Local,
}

impl std::str::FromStr for TemplateSourceKind {
    type Err = ToolsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "git" => Ok(Self::Git),
            "archive" | "zip" => Ok(Self::Archive),
            "local" => Ok(Self::Local),
            other => Err(ToolsError::config(
                TEMPLATE_SOURCE_ENV,
                format!("unknown template source '{}' (expected git, archive or local)", other),
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateConfig {
    pub source: TemplateSourceKind,
    pub url: String,
    pub archive_url: String,
    pub local_dir: Option<PathBuf>,
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self {
            source: TemplateSourceKind::Git,
            url: DEFAULT_TEMPLATE_URL.to_string(),
            archive_url: DEFAULT_TEMPLATE_ARCHIVE_URL.to_string(),
            local_dir: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolsConfig {
    pub template: TemplateConfig,
    /// Dependency install command run in a freshly scaffolded project
    pub install_command: String,
    /// Per-stream cap on captured command output
    pub max_output_bytes: usize,
    /// Parent directory for ephemeral workspaces (system temp dir when unset)
    pub temp_root: Option<PathBuf>,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            template: TemplateConfig::default(),
            install_command: DEFAULT_INSTALL_COMMAND.to_string(),
            max_output_bytes: DEFAULT_MAX_OUTPUT_BYTES,
            temp_root: None,
        }
    }
}

impl ToolsConfig {
    /// Load configuration for a workspace.
    ///
    /// An explicit path must exist; the workspace file is optional.
    pub fn load(workspace: Option<&Path>, explicit: Option<&Path>) -> Result<Self> {
        let mut config = match (explicit, workspace) {
            (Some(path), _) => Self::from_file(path)?,
            (None, Some(root)) if root.join(CONFIG_FILE_NAME).is_file() => {
                Self::from_file(&root.join(CONFIG_FILE_NAME))?
            }
            _ => Self::default(),
        };

        config.apply_env_with(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Parse a YAML config file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ToolsError::io(format!("Failed to read {}", path.display()), e))?;
        Self::from_yaml(path, &content)
    }

    fn from_yaml(path: &Path, content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content).map_err(|e| ToolsError::config(path, e))
    }

    /// Apply environment overrides using the given lookup
    pub fn apply_env_with<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(kind) = lookup(TEMPLATE_SOURCE_ENV) {
            self.template.source = kind.parse()?;
        }

        if let Some(url) = lookup(TEMPLATE_URL_ENV) {
            match self.template.source {
                TemplateSourceKind::Archive => self.template.archive_url = url,
                _ => self.template.url = url,
            }
        }

        Ok(())
    }

    /// Force the local template source (development use)
    pub fn use_local_templates(&mut self, dir: PathBuf) {
        self.template.source = TemplateSourceKind::Local;
        self.template.local_dir = Some(dir);
    }

    /// Parent directory for ephemeral workspaces
    pub fn temp_root(&self) -> PathBuf {
        self.temp_root.clone().unwrap_or_else(std::env::temp_dir)
    }
}
