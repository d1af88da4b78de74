//! Recursive directory tree copying

use crate::error::{Result, ToolsError};
use std::path::Path;
use tokio::fs;
use walkdir::WalkDir;

/// Counts of what a tree copy produced
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CopyStats {
    pub files: usize,
    pub directories: usize,
}

/// Copy every file and subdirectory of `source` into `destination`.
///
/// `destination` and any nested directories are created as needed. Files are
/// duplicated byte-for-byte. A failure part way leaves the partial copy in place.
pub async fn copy_tree(source: &Path, destination: &Path) -> Result<CopyStats> {
    fs::create_dir_all(destination).await.map_err(|e| {
        ToolsError::io(
            format!("Failed to create directory {}", destination.display()),
            e,
        )
    })?;

    let mut stats = CopyStats::default();

    for entry in WalkDir::new(source).min_depth(1).sort_by_file_name() {
        let entry = entry.map_err(|e| {
            let context = format!("Failed to read {}", source.display());
            ToolsError::io(context, e.into())
        })?;

        let relative = entry.path().strip_prefix(source).map_err(|_| {
            ToolsError::io(
                format!("Unexpected path outside {}", source.display()),
                std::io::Error::other(entry.path().display().to_string()),
            )
        })?;
        let target = destination.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target).await.map_err(|e| {
                ToolsError::io(format!("Failed to create directory {}", target.display()), e)
            })?;
            stats.directories += 1;
        } else {
            fs::copy(entry.path(), &target).await.map_err(|e| {
                ToolsError::io(
                    format!(
                        "Failed to copy {} to {}",
                        entry.path().display(),
                        target.display()
                    ),
                    e,
                )
            })?;
            stats.files += 1;
        }
    }

    tracing::debug!(
        source = %source.display(),
        destination = %destination.display(),
        files = stats.files,
        directories = stats.directories,
        "copied tree"
    );

    Ok(stats)
}
