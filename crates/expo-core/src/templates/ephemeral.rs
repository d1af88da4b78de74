//! Scoped temporary directory for staging template downloads

use crate::error::{Result, ToolsError};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Prefix of every ephemeral workspace directory name
pub const WORKSPACE_PREFIX: &str = "expo-temp";

/// A uniquely named directory under a temp root, removed when dropped.
///
/// Removal runs on every exit path of the owning operation, including early
/// returns through `?`. It does not run when the process is terminated
/// without unwinding (the CLI's Ctrl-C handler exits directly), so an
/// interrupted clone or copy can leave an `expo-temp-*` directory behind.
#[derive(Debug)]
pub struct EphemeralWorkspace {
    path: PathBuf,
    dir: Option<TempDir>,
}

impl EphemeralWorkspace {
    /// Create a fresh directory named `<prefix>-<random>` under `root`
    pub fn create_in(root: &Path, prefix: &str) -> Result<Self> {
        std::fs::create_dir_all(root).map_err(|e| {
            ToolsError::io(format!("Failed to create temp root {}", root.display()), e)
        })?;

        let dir = tempfile::Builder::new()
            .prefix(&format!("{}-", prefix))
            .tempdir_in(root)
            .map_err(|e| {
                ToolsError::io(
                    format!("Failed to create a temporary directory in {}", root.display()),
                    e,
                )
            })?;

        let path = dir.path().to_path_buf();
        tracing::debug!(path = %path.display(), "created ephemeral workspace");
        Ok(Self {
            path,
            dir: Some(dir),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for EphemeralWorkspace {
    fn drop(&mut self) {
        let Some(dir) = self.dir.take() else { return };
        match dir.close() {
            Ok(()) => tracing::debug!(path = %self.path.display(), "removed ephemeral workspace"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!(
                path = %self.path.display(),
                error = %e,
                "failed to remove ephemeral workspace"
            ),
        }
    }
}
