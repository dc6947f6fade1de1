//! External tool invocation.
//!
//! Compilers, archivers and linker drivers are spawned directly (no shell),
//! with the caller's environment and working directory. Output is captured:
//! stderr of a failing tool is carried in the error, stderr of a successful
//! tool (usually warnings) is logged.

use std::process::Stdio;

use tokio::process::Command;
use tracing::{debug, warn};

use crate::execute::types::BuildError;
use crate::settings::ToolCommand;

/// A fully assembled command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolInvocation {
  pub program: String,
  pub args: Vec<String>,
}

impl ToolInvocation {
  /// Start from a configured tool, keeping its prefix arguments.
  pub fn from_tool(tool: &ToolCommand) -> Self {
    Self {
      program: tool.program.clone(),
      args: tool.args.clone(),
    }
  }

  pub fn arg(mut self, arg: impl Into<String>) -> Self {
    self.args.push(arg.into());
    self
  }

  pub fn args<I, S>(mut self, args: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.args.extend(args.into_iter().map(Into::into));
    self
  }

  /// The command line as a single string, for logs and error messages.
  pub fn display(&self) -> String {
    std::iter::once(self.program.as_str())
      .chain(self.args.iter().map(String::as_str))
      .collect::<Vec<_>>()
      .join(" ")
  }
}

/// Run `invocation` to completion.
///
/// # Returns
///
/// The trimmed stdout of the tool on success, or `BuildError::ToolFailed`
/// carrying the exit code and stderr when it exits non-zero.
pub async fn run_tool(invocation: &ToolInvocation) -> Result<String, BuildError> {
  let cmd = invocation.display();
  debug!(cmd = %cmd, "executing command");

  let output = Command::new(&invocation.program)
    .args(&invocation.args)
    .stdin(Stdio::null())
    .output()
    .await
    .map_err(|source| BuildError::Spawn {
      program: invocation.program.clone(),
      source,
    })?;

  let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
  let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();

  if !output.status.success() {
    if !stdout.is_empty() {
      debug!(stdout = %stdout, "command stdout");
    }

    return Err(BuildError::ToolFailed {
      tool: invocation.program.clone(),
      cmd,
      code: output.status.code(),
      stderr,
    });
  }

  if !stderr.trim().is_empty() {
    warn!(cmd = %cmd, stderr = %stderr.trim(), "command reported diagnostics");
  }
  if !stdout.is_empty() {
    debug!(stdout = %stdout, "command output");
  }

  Ok(stdout)
}
