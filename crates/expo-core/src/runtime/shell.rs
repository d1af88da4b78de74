//! Shell command execution with bounded output capture

use crate::error::{Result, ToolsError};
use std::path::Path;
use std::process::Stdio;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command as TokioCommand;

/// Default per-stream capture limit (10 MiB), enough for verbose build logs
pub const DEFAULT_MAX_OUTPUT_BYTES: usize = 10 * 1024 * 1024;

const READ_CHUNK: usize = 8 * 1024;

/// Captured output of a finished command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandResult {
    pub stdout: String,
    pub stderr: String,
}

impl CommandResult {
    pub fn new(stdout: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self {
            stdout: stdout.into(),
            stderr: stderr.into(),
        }
    }
}

/// Anything that can run a shell command line in a working directory
///
/// The production implementation is [`ShellExecutor`]; tests substitute
/// recording fakes so flows can be exercised without `npx` or `git`.
#[allow(async_fn_in_trait)]
pub trait CommandRunner {
    async fn run(&self, command: &str, working_dir: &Path) -> Result<CommandResult>;
}

/// Shell used to interpret command lines on the current host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostShell {
    Posix,
    Windows,
}

impl HostShell {
    pub fn for_host() -> Self {
        if cfg!(windows) {
            HostShell::Windows
        } else {
            HostShell::Posix
        }
    }

    pub fn program(&self) -> &'static str {
        match self {
            HostShell::Posix => "sh",
            HostShell::Windows => "cmd",
        }
    }

    pub fn command_flag(&self) -> &'static str {
        match self {
            HostShell::Posix => "-c",
            HostShell::Windows => "/C",
        }
    }

    /// Quote one argument so the shell passes it through literally.
    ///
    /// POSIX uses single quotes, which suppress `$`, backtick and backslash
    /// expansion. `cmd` has no such quoting: embedded `"` are doubled, but
    /// `%VAR%` still expands inside the quotes.
    pub fn quote(&self, arg: &str) -> String {
        match self {
            HostShell::Posix => format!("'{}'", arg.replace('\'', "'\\''")),
            HostShell::Windows => format!("\"{}\"", arg.replace('"', "\"\"")),
        }
    }

    fn command(&self, command_line: &str) -> TokioCommand {
        let mut cmd = TokioCommand::new(self.program());
        cmd.arg(self.command_flag()).arg(command_line);
        cmd
    }
}

/// Quote a single argument for interpolation into a host command line
pub fn quote_arg(arg: &str) -> String {
    HostShell::for_host().quote(arg)
}

/// Runs command lines through the host shell, capturing stdout and stderr
#[derive(Debug, Clone)]
pub struct ShellExecutor {
    shell: HostShell,
    max_output_bytes: usize,
}

impl Default for ShellExecutor {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_OUTPUT_BYTES)
    }
}

impl ShellExecutor {
    pub fn new(max_output_bytes: usize) -> Self {
        Self {
            shell: HostShell::for_host(),
            max_output_bytes,
        }
    }

    pub fn shell(&self) -> HostShell {
        self.shell
    }
}

impl CommandRunner for ShellExecutor {
    async fn run(&self, command: &str, working_dir: &Path) -> Result<CommandResult> {
        tracing::debug!(command, cwd = %working_dir.display(), "spawning command");

        let mut child = self
            .shell
            .command(command)
            .current_dir(working_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| ToolsError::execution(command, format!("failed to spawn: {}", e)))?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| ToolsError::execution(command, "stdout was not captured"))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| ToolsError::execution(command, "stderr was not captured"))?;

        let (stdout, stderr) = tokio::try_join!(
            read_capped(stdout, self.max_output_bytes),
            read_capped(stderr, self.max_output_bytes)
        )
        .map_err(|e| ToolsError::execution(command, format!("failed to read output: {}", e)))?;

        let status = child
            .wait()
            .await
            .map_err(|e| ToolsError::execution(command, format!("failed to wait: {}", e)))?;

        if stdout.overflowed || stderr.overflowed {
            return Err(ToolsError::execution(
                command,
                format!("output exceeded {} bytes", self.max_output_bytes),
            ));
        }

        let result = CommandResult {
            stdout: String::from_utf8_lossy(&stdout.bytes).into_owned(),
            stderr: String::from_utf8_lossy(&stderr.bytes).into_owned(),
        };

        if !status.success() {
            let code = status
                .code()
                .map(|c| c.to_string())
                .unwrap_or_else(|| "signal".to_string());
            let detail = result.stderr.trim();
            let message = if detail.is_empty() {
                format!("exit code {}", code)
            } else {
                format!("exit code {}: {}", code, detail)
            };
            return Err(ToolsError::execution(command, message));
        }

        tracing::debug!(
            command,
            stdout_len = result.stdout.len(),
            stderr_len = result.stderr.len(),
            "command finished"
        );
        Ok(result)
    }
}

struct CappedOutput {
    bytes: Vec<u8>,
    overflowed: bool,
}

/// Read a stream to EOF, keeping at most `limit` bytes.
/// Past the limit the stream is still drained so the child never blocks on a full pipe.
async fn read_capped<R: AsyncRead + Unpin>(mut reader: R, limit: usize) -> std::io::Result<CappedOutput> {
    let mut bytes = Vec::new();
    let mut overflowed = false;
    let mut chunk = [0u8; READ_CHUNK];

    loop {
        let n = reader.read(&mut chunk).await?;
        if n == 0 {
            break;
        }
        if overflowed {
            continue;
        }
        let room = limit.saturating_sub(bytes.len());
        if n > room {
            bytes.extend_from_slice(&chunk[..room]);
            overflowed = true;
        } else {
            bytes.extend_from_slice(&chunk[..n]);
        }
    }

    Ok(CappedOutput { bytes, overflowed })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_shell_dispatch() {
        assert_eq!(HostShell::Posix.program(), "sh");
        assert_eq!(HostShell::Posix.command_flag(), "-c");
        assert_eq!(HostShell::Windows.program(), "cmd");
        assert_eq!(HostShell::Windows.command_flag(), "/C");
    }

    #[test]
    fn test_posix_quoting_is_literal() {
        let shell = HostShell::Posix;
        assert_eq!(shell.quote("/tmp/my app"), "'/tmp/my app'");
        assert_eq!(shell.quote("$HOME`id`"), "'$HOME`id`'");
        assert_eq!(shell.quote("it's"), "'it'\\''s'");
    }

    #[test]
    fn test_windows_quoting_doubles_quotes() {
        let shell = HostShell::Windows;
        assert_eq!(shell.quote("C:\\My App"), "\"C:\\My App\"");
        assert_eq!(shell.quote("a\"b"), "\"a\"\"b\"");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_quoted_argument_is_not_expanded() {
        let dir = tempfile::tempdir().unwrap();
        let command = format!("printf %s {}", quote_arg("$HOME `echo hi` it's"));
        let result = ShellExecutor::default().run(&command, dir.path()).await.unwrap();
        assert_eq!(result.stdout, "$HOME `echo hi` it's");
    }

    #[tokio::test]
    async fn test_read_capped_truncates_and_drains() {
        let data = vec![b'x'; 100];
        let out = read_capped(&data[..], 10).await.unwrap();
        assert!(out.overflowed);
        assert_eq!(out.bytes.len(), 10);

        let out = read_capped(&data[..], 100).await.unwrap();
        assert!(!out.overflowed);
        assert_eq!(out.bytes.len(), 100);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_run_captures_stdout_and_stderr() {
        let dir = tempfile::tempdir().unwrap();
        let executor = ShellExecutor::default();
        let result = executor
            .run("echo hello; echo warn 1>&2", dir.path())
            .await
            .unwrap();
        assert_eq!(result.stdout, "hello\n");
        assert_eq!(result.stderr, "warn\n");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_run_uses_working_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("marker.txt"), "here").unwrap();
        let result = ShellExecutor::default()
            .run("cat marker.txt", dir.path())
            .await
            .unwrap();
        assert_eq!(result.stdout, "here");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_run_non_zero_exit_is_execution_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = ShellExecutor::default()
            .run("echo broken 1>&2; exit 3", dir.path())
            .await
            .unwrap_err();
        match err {
            ToolsError::Execution { command, message } => {
                assert!(command.contains("exit 3"));
                assert!(message.contains("exit code 3"));
                assert!(message.contains("broken"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_run_output_cap() {
        let dir = tempfile::tempdir().unwrap();
        let err = ShellExecutor::new(16)
            .run("printf '%0100d' 0", dir.path())
            .await
            .unwrap_err();
        assert!(matches!(err, ToolsError::Execution { ref message, .. } if message.contains("exceeded 16 bytes")));
    }

    #[tokio::test]
    async fn test_run_missing_directory_fails() {
        let err = ShellExecutor::default()
            .run("echo hi", Path::new("/definitely/not/a/real/dir"))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolsError::Execution { .. }));
    }
}
