//! Template acquisition from a git remote, a zip archive, or a local directory
//!
//! Every source is staged inside an [`EphemeralWorkspace`], stripped of
//! version-control metadata, then copied into the destination. The workspace
//! is removed when acquisition returns, whatever the outcome.

use super::copier::copy_tree;
use super::ephemeral::{EphemeralWorkspace, WORKSPACE_PREFIX};
use crate::config::{TemplateSourceKind, ToolsConfig};
use crate::error::{Result, ToolsError};
use crate::runtime::shell::{quote_arg, CommandRunner};
use crate::scaffold::progress::{NoProgress, ProgressObserver, ScaffoldPhase};
use std::io::{Cursor, Read};
use std::path::{Component, Path, PathBuf};
use tokio::fs;
use url::Url;
use zip::ZipArchive;

/// Version-control metadata removed from every staged template
const VCS_METADATA: &str = ".git";

/// Subdirectory of the ephemeral workspace the template is staged into
const STAGING_DIR: &str = "template";

/// User agent for archive downloads
const USER_AGENT: &str = concat!("expo-tools/", env!("CARGO_PKG_VERSION"));

/// Template source - git remote, zip archive URL, or local directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateSource {
    Git(Url),
    Archive(Url),
    Local(PathBuf),
}

impl TemplateSource {
    /// Resolve the configured template source
    pub fn from_config(config: &ToolsConfig) -> Result<Self> {
        let template = &config.template;
        match template.source {
            TemplateSourceKind::Git => Ok(Self::Git(parse_url(&template.url)?)),
            TemplateSourceKind::Archive => Ok(Self::Archive(parse_url(&template.archive_url)?)),
            TemplateSourceKind::Local => template
                .local_dir
                .clone()
                .map(Self::Local)
                .ok_or_else(|| {
                    ToolsError::Validation(
                        "template.local_dir must be set when template.source is 'local'"
                            .to_string(),
                    )
                }),
        }
    }

    /// Human-readable location for messages
    pub fn location(&self) -> String {
        match self {
            Self::Git(url) | Self::Archive(url) => url.to_string(),
            Self::Local(path) => path.display().to_string(),
        }
    }
}

fn parse_url(raw: &str) -> Result<Url> {
    Url::parse(raw).map_err(|e| ToolsError::Validation(format!("Invalid template URL {}: {}", raw, e)))
}

/// Fetches a template into a destination directory
pub struct TemplateAcquirer<'r, R> {
    runner: &'r R,
    source: TemplateSource,
    temp_root: PathBuf,
}

impl<'r, R: CommandRunner> TemplateAcquirer<'r, R> {
    pub fn new(runner: &'r R, source: TemplateSource, temp_root: PathBuf) -> Self {
        Self {
            runner,
            source,
            temp_root,
        }
    }

    /// Create an acquirer from configuration
    pub fn from_config(runner: &'r R, config: &ToolsConfig) -> Result<Self> {
        Ok(Self::new(
            runner,
            TemplateSource::from_config(config)?,
            config.temp_root(),
        ))
    }

    pub fn source(&self) -> &TemplateSource {
        &self.source
    }

    /// Fetch the template into `destination` without progress reporting
    pub async fn acquire_template(&self, destination: &Path) -> Result<()> {
        self.acquire(destination, &mut NoProgress).await
    }

    /// Fetch the template into `destination`, reporting the copy phase
    pub async fn acquire(
        &self,
        destination: &Path,
        observer: &mut dyn ProgressObserver,
    ) -> Result<()> {
        let workspace = EphemeralWorkspace::create_in(&self.temp_root, WORKSPACE_PREFIX)?;
        let staging = workspace.path().join(STAGING_DIR);

        tracing::info!(source = %self.source.location(), "fetching template");
        self.stage(workspace.path(), &staging).await?;
        strip_vcs_metadata(&staging).await?;

        observer.on_phase(ScaffoldPhase::Copying);
        copy_tree(&staging, destination).await?;

        Ok(())
    }

    async fn stage(&self, workspace: &Path, staging: &Path) -> Result<()> {
        match &self.source {
            TemplateSource::Git(url) => self.clone_repository(url, workspace, staging).await,
            TemplateSource::Archive(url) => {
                let bytes = download_archive(url).await?;
                extract_archive(&bytes, staging)
            }
            TemplateSource::Local(dir) => copy_tree(dir, staging).await.map(|_| ()),
        }
    }

    async fn clone_repository(&self, url: &Url, workspace: &Path, staging: &Path) -> Result<()> {
        let command = format!(
            "git clone --depth 1 {} {}",
            quote_arg(url.as_str()),
            quote_arg(&staging.to_string_lossy())
        );

        self.runner
            .run(&command, workspace)
            .await
            .map(|_| ())
            .map_err(|e| ToolsError::Network {
                url: url.to_string(),
                message: e.to_string(),
            })
    }
}

async fn download_archive(url: &Url) -> Result<Vec<u8>> {
    let network = |message: String| ToolsError::Network {
        url: url.to_string(),
        message,
    };

    let client = reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .build()
        .unwrap_or_else(|_| reqwest::Client::new());

    let response = client
        .get(url.clone())
        .send()
        .await
        .map_err(|e| network(e.to_string()))?;

    if !response.status().is_success() {
        return Err(network(format!("HTTP {}", response.status())));
    }

    let bytes = response.bytes().await.map_err(|e| network(e.to_string()))?;
    Ok(bytes.to_vec())
}

/// Extract a zip archive into `target`.
///
/// When every entry lives under one top-level directory (GitHub archive
/// layout) that directory is stripped.
pub fn extract_archive(bytes: &[u8], target: &Path) -> Result<()> {
    let corrupt = |e: zip::result::ZipError| {
        ToolsError::io("Failed to read template archive", std::io::Error::other(e))
    };

    let mut archive = ZipArchive::new(Cursor::new(bytes)).map_err(corrupt)?;

    let mut names = Vec::with_capacity(archive.len());
    for i in 0..archive.len() {
        let file = archive.by_index(i).map_err(corrupt)?;
        names.push(file.enclosed_name());
    }
    let prefix = common_root(&names);

    std::fs::create_dir_all(target).map_err(|e| {
        ToolsError::io(format!("Failed to create directory {}", target.display()), e)
    })?;

    for (i, name) in names.into_iter().enumerate() {
        // Entries escaping the archive root are skipped
        let Some(name) = name else { continue };
        let relative = match &prefix {
            Some(prefix) if name.starts_with(prefix) => name
                .strip_prefix(prefix)
                .map(Path::to_path_buf)
                .unwrap_or_default(),
            _ => name,
        };
        if relative.as_os_str().is_empty() {
            continue;
        }

        let out_path = target.join(&relative);
        let mut file = archive.by_index(i).map_err(corrupt)?;

        if file.is_dir() {
            std::fs::create_dir_all(&out_path).map_err(|e| {
                ToolsError::io(format!("Failed to create directory {}", out_path.display()), e)
            })?;
            continue;
        }

        if let Some(parent) = out_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                ToolsError::io(format!("Failed to create directory {}", parent.display()), e)
            })?;
        }

        let mut contents = Vec::new();
        file.read_to_end(&mut contents)
            .map_err(|e| ToolsError::io(format!("Failed to extract {}", relative.display()), e))?;
        std::fs::write(&out_path, &contents)
            .map_err(|e| ToolsError::io(format!("Failed to write {}", out_path.display()), e))?;

        apply_unix_mode(&out_path, file.unix_mode());
    }

    Ok(())
}

#[cfg(unix)]
fn apply_unix_mode(path: &Path, mode: Option<u32>) {
    use std::os::unix::fs::PermissionsExt;
    if let Some(mode) = mode {
        let _ = std::fs::set_permissions(path, std::fs::Permissions::from_mode(mode));
    }
}

#[cfg(not(unix))]
fn apply_unix_mode(_path: &Path, _mode: Option<u32>) {}

/// The single top-level directory shared by every entry, if there is one
fn common_root(names: &[Option<PathBuf>]) -> Option<PathBuf> {
    let mut root: Option<PathBuf> = None;
    let mut has_nested = false;

    for name in names.iter().flatten() {
        let mut components = name.components();
        let first = match components.next() {
            Some(Component::Normal(first)) => PathBuf::from(first),
            _ => return None,
        };
        if components.next().is_some() {
            has_nested = true;
        }
        match &root {
            Some(existing) if *existing != first => return None,
            Some(_) => {}
            None => root = Some(first),
        }
    }

    if has_nested {
        root
    } else {
        None
    }
}

/// Remove the staged template's `.git` so the project starts without history
async fn strip_vcs_metadata(staging: &Path) -> Result<()> {
    let vcs = staging.join(VCS_METADATA);
    let metadata = match fs::symlink_metadata(&vcs).await {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(ToolsError::io(format!("Failed to inspect {}", vcs.display()), e)),
    };

    let removed = if metadata.is_dir() {
        fs::remove_dir_all(&vcs).await
    } else {
        fs::remove_file(&vcs).await
    };
    removed.map_err(|e| ToolsError::io(format!("Failed to remove {}", vcs.display()), e))
}
