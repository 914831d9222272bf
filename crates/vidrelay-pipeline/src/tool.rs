//! External tool invocation.
//!
//! The downloader is always executed with an argument vector, never through a
//! shell, so URLs containing shell metacharacters cannot alter the command.
//! Each invocation spawns one child process; retry policy belongs to callers.

use crate::error::PipelineError;
use std::process::{ExitStatus, Stdio};
use std::time::Duration;
use tokio::process::Command;

/// Validate that a tool path doesn't contain shell metacharacters or
/// dangerous sequences.
fn validate_tool_path(path: &str) -> Result<(), PipelineError> {
    let dangerous_chars = [';', '|', '&', '$', '`', '(', ')', '<', '>', '\n', '\r'];
    if path.chars().any(|c| dangerous_chars.contains(&c)) {
        return Err(PipelineError::InvalidToolPath(path.to_string()));
    }

    if path.contains("..") {
        return Err(PipelineError::InvalidToolPath(path.to_string()));
    }

    if !path
        .chars()
        .all(|c| c.is_alphanumeric() || c == '/' || c == '-' || c == '_' || c == '.' || c == '\\')
    {
        return Err(PipelineError::InvalidToolPath(path.to_string()));
    }

    Ok(())
}

/// Captured result of one tool invocation.
#[derive(Debug)]
pub struct ToolOutput {
    pub status: ExitStatus,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

impl ToolOutput {
    pub fn stdout_lossy(&self) -> String {
        String::from_utf8_lossy(&self.stdout).into_owned()
    }
}

/// Runs the external downloader with a deadline and captures its output.
#[derive(Clone, Debug)]
pub struct ToolRunner {
    tool_path: String,
}

impl ToolRunner {
    pub fn new(tool_path: String) -> Result<Self, PipelineError> {
        validate_tool_path(&tool_path)?;
        Ok(Self { tool_path })
    }

    pub fn tool_path(&self) -> &str {
        &self.tool_path
    }

    /// Run the tool with the given arguments. Fails with `ToolTimeout` if the
    /// process does not exit within `timeout` (the child is killed), and with
    /// `ToolFailed` if it exits non-zero.
    #[tracing::instrument(skip(self, args), fields(tool = %self.tool_path))]
    pub async fn run(&self, args: &[&str], timeout: Duration) -> Result<ToolOutput, PipelineError> {
        let child = Command::new(&self.tool_path)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()?;

        // kill_on_drop reaps the child when the timeout branch drops the
        // wait future.
        let output = match tokio::time::timeout(timeout, child.wait_with_output()).await {
            Ok(result) => result?,
            Err(_) => {
                tracing::warn!(timeout_secs = timeout.as_secs(), "Tool invocation timed out");
                return Err(PipelineError::ToolTimeout { timeout });
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
            tracing::warn!(status = ?output.status.code(), "Tool exited non-zero");
            return Err(PipelineError::ToolFailed {
                status: output.status.code(),
                stderr,
            });
        }

        Ok(ToolOutput {
            status: output.status,
            stdout: output.stdout,
            stderr: output.stderr,
        })
    }

    /// Run the tool's built-in self-updater (`-U`) and return its output.
    pub async fn self_update(&self, timeout: Duration) -> Result<String, PipelineError> {
        let output = self.run(&["-U"], timeout).await?;
        Ok(output.stdout_lossy())
    }

    /// Report the installed tool version (`--version`).
    pub async fn version(&self, timeout: Duration) -> Result<String, PipelineError> {
        let output = self.run(&["--version"], timeout).await?;
        Ok(output.stdout_lossy().trim().to_string())
    }
}
