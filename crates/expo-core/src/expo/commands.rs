//! Expo CLI command assembly

use crate::error::{Result, ToolsError};
use crate::interaction::SelectItem;
use clap::ValueEnum;
use std::fmt;

/// `npx expo doctor`
pub const DIAGNOSTIC_COMMAND: &str = "npx expo doctor";

/// Target platform of a build
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Platform {
    Ios,
    Android,
    Web,
}

impl Platform {
    pub const ALL: [Platform; 3] = [Platform::Ios, Platform::Android, Platform::Web];

    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Ios => "ios",
            Platform::Android => "android",
            Platform::Web => "web",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Platform::Ios => "iOS",
            Platform::Android => "Android",
            Platform::Web => "Web",
        }
    }

    pub fn from_value(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.as_str() == value)
    }

    /// Artifact types this platform offers; empty when there is no choice
    pub fn artifacts(&self) -> &'static [Artifact] {
        match self {
            Platform::Ios => &[Artifact::Archive, Artifact::Simulator],
            Platform::Android => &[Artifact::Apk, Artifact::AppBundle],
            Platform::Web => &[],
        }
    }

    pub fn select_items() -> Vec<SelectItem> {
        Self::ALL
            .iter()
            .map(|p| {
                SelectItem::new(p.as_str(), p.label(), format!("Build for {}", p.hint_target()))
            })
            .collect()
    }

    fn hint_target(&self) -> &'static str {
        match self {
            Platform::Ios => "iOS devices",
            Platform::Android => "Android devices",
            Platform::Web => "Web platform",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Release channel of a build
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BuildType {
    Development,
    Preview,
    Production,
}

impl BuildType {
    pub const ALL: [BuildType; 3] = [
        BuildType::Development,
        BuildType::Preview,
        BuildType::Production,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BuildType::Development => "development",
            BuildType::Preview => "preview",
            BuildType::Production => "production",
        }
    }

    pub fn from_value(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|b| b.as_str() == value)
    }

    /// Flags appended to the build command
    pub fn flags(&self) -> &'static str {
        match self {
            BuildType::Development => "--dev",
            BuildType::Preview => "--release-channel preview",
            BuildType::Production => "--release-channel production",
        }
    }

    pub fn select_items() -> Vec<SelectItem> {
        vec![
            SelectItem::new("development", "Development", "Build for testing during development"),
            SelectItem::new("preview", "Preview", "Build for internal testing"),
            SelectItem::new("production", "Production", "Build for store submission"),
        ]
    }
}

impl fmt::Display for BuildType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Platform-specific artifact produced by a native build
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Artifact {
    Archive,
    Simulator,
    Apk,
    AppBundle,
}

impl Artifact {
    pub fn as_str(&self) -> &'static str {
        match self {
            Artifact::Archive => "archive",
            Artifact::Simulator => "simulator",
            Artifact::Apk => "apk",
            Artifact::AppBundle => "app-bundle",
        }
    }

    pub fn from_value(value: &str) -> Option<Self> {
        [
            Artifact::Archive,
            Artifact::Simulator,
            Artifact::Apk,
            Artifact::AppBundle,
        ]
        .into_iter()
        .find(|a| a.as_str() == value)
    }

    pub fn select_items(platform: Platform) -> Vec<SelectItem> {
        platform
            .artifacts()
            .iter()
            .map(|a| SelectItem::new(a.as_str(), a.as_str(), ""))
            .collect()
    }
}

impl fmt::Display for Artifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A validated build invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildRequest {
    platform: Platform,
    build_type: BuildType,
    artifact: Option<Artifact>,
}

impl BuildRequest {
    /// iOS and Android need an artifact valid for the platform; web takes none
    pub fn new(platform: Platform, build_type: BuildType, artifact: Option<Artifact>) -> Result<Self> {
        let allowed = platform.artifacts();
        match artifact {
            Some(a) if !allowed.contains(&a) => {
                return Err(ToolsError::Validation(format!(
                    "Artifact '{}' is not available for {}",
                    a, platform
                )))
            }
            None if !allowed.is_empty() => {
                return Err(ToolsError::Validation(format!(
                    "A build type ({}) is required for {}",
                    allowed
                        .iter()
                        .map(Artifact::as_str)
                        .collect::<Vec<_>>()
                        .join(" or "),
                    platform
                )))
            }
            _ => {}
        }

        Ok(Self {
            platform,
            build_type,
            artifact,
        })
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    pub fn build_type(&self) -> BuildType {
        self.build_type
    }

    pub fn artifact(&self) -> Option<Artifact> {
        self.artifact
    }

    /// `npx expo build:<platform> <channel flags> [--type <artifact>]`
    pub fn command(&self) -> String {
        let mut command = format!("npx expo build:{} {}", self.platform, self.build_type.flags());
        if let Some(artifact) = self.artifact {
            command.push_str(" --type ");
            command.push_str(artifact.as_str());
        }
        command
    }
}

/// Hosting target for a web build
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DeployTarget {
    ExpoHosting,
    GithubPages,
    Netlify,
    Vercel,
}

impl DeployTarget {
    pub const ALL: [DeployTarget; 4] = [
        DeployTarget::ExpoHosting,
        DeployTarget::GithubPages,
        DeployTarget::Netlify,
        DeployTarget::Vercel,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DeployTarget::ExpoHosting => "expo-hosting",
            DeployTarget::GithubPages => "github-pages",
            DeployTarget::Netlify => "netlify",
            DeployTarget::Vercel => "vercel",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DeployTarget::ExpoHosting => "Expo Hosting",
            DeployTarget::GithubPages => "GitHub Pages",
            DeployTarget::Netlify => "Netlify",
            DeployTarget::Vercel => "Vercel",
        }
    }

    pub fn from_value(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == value)
    }

    pub fn command(&self) -> &'static str {
        match self {
            DeployTarget::ExpoHosting => "npx expo publish:web",
            DeployTarget::GithubPages => "npx gh-pages -d web-build",
            DeployTarget::Netlify => "npx netlify deploy --dir=web-build",
            DeployTarget::Vercel => "npx vercel web-build",
        }
    }

    pub fn select_items() -> Vec<SelectItem> {
        Self::ALL
            .iter()
            .map(|t| SelectItem::new(t.as_str(), t.label(), format!("Deploy to {}", t.hint())))
            .collect()
    }

    fn hint(&self) -> &'static str {
        match self {
            DeployTarget::ExpoHosting => "Expo hosting service",
            other => other.label(),
        }
    }
}

impl fmt::Display for DeployTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}
