//! Target folder preparation for new projects

use crate::error::{Result, ToolsError};
use crate::interaction::{keys, Prompter};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Result of preparing `<root>/<app name>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetFolder {
    /// Empty directory ready to receive the template
    Ready(PathBuf),
    /// The folder exists and the user chose not to overwrite it
    Cancelled,
}

/// Create `<root>/<app_name>`, asking before replacing an existing entry.
///
/// A declined or dismissed overwrite leaves the existing folder untouched.
pub async fn prepare_target_folder(
    root: &Path,
    app_name: &str,
    prompter: &mut dyn Prompter,
) -> Result<TargetFolder> {
    let target = root.join(app_name);

    if let Ok(metadata) = fs::symlink_metadata(&target).await {
        let overwrite = prompter.confirm(
            keys::OVERWRITE,
            &format!(
                "Folder \"{}\" already exists. Do you want to overwrite it?",
                app_name
            ),
            false,
        )?;
        if overwrite != Some(true) {
            return Ok(TargetFolder::Cancelled);
        }

        tracing::info!(target = %target.display(), "removing existing folder");
        let removed = if metadata.is_dir() {
            fs::remove_dir_all(&target).await
        } else {
            fs::remove_file(&target).await
        };
        removed.map_err(|e| {
            ToolsError::io(format!("Failed to remove {}", target.display()), e)
        })?;
    }

    fs::create_dir_all(&target)
        .await
        .map_err(|e| ToolsError::io(format!("Failed to create {}", target.display()), e))?;

    Ok(TargetFolder::Ready(target))
}
