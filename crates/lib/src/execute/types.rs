//! Types for module builds.
//!
//! This module defines the error type, the per-module result, and the units of
//! work handed to the compile scheduler and the linker.

use std::path::PathBuf;

use thiserror::Error;

use crate::config::{ConfigError, TargetType};

/// One translation unit: a source file and the object file it compiles into.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CompilationJob {
  pub source: PathBuf,
  pub object: PathBuf,
}

/// A built artifact as seen by modules that depend on it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DependencyArtifact {
  pub path: PathBuf,
  pub target_type: TargetType,
}

/// Result of building a single module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildResult {
  /// Whether the artifact was linked again during this session.
  pub rebuilt: bool,

  /// The module's own artifact.
  pub artifact: DependencyArtifact,

  /// Artifacts of every transitive dependency, in link order.
  /// Consumers link against `artifact` followed by these.
  pub link_artifacts: Vec<DependencyArtifact>,
}

/// Counters for one build session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildStats {
  /// Modules visited (each counted once).
  pub modules: usize,
  /// Translation units compiled.
  pub compiled: usize,
  /// Artifacts linked or archived.
  pub linked: usize,
}

/// Errors that can occur while building a module.
#[derive(Debug, Error)]
pub enum BuildError {
  /// Module configuration could not be loaded or is invalid.
  #[error(transparent)]
  Config(#[from] ConfigError),

  /// An external tool exited unsuccessfully.
  #[error("{tool} {}: {cmd}{}", format_status(.code), format_stderr(.stderr))]
  ToolFailed {
    tool: String,
    cmd: String,
    code: Option<i32>,
    stderr: String,
  },

  /// An external tool could not be started.
  #[error("failed to run {program}: {source}")]
  Spawn {
    program: String,
    #[source]
    source: std::io::Error,
  },

  /// I/O error while inspecting or preparing the build tree.
  #[error("io error: {0}")]
  Io(#[from] std::io::Error),

  /// A compile task panicked or was cancelled.
  #[error("compile task failed: {0}")]
  TaskFailed(String),
}

impl BuildError {
  /// Process exit code to report for this error.
  ///
  /// Tool failures propagate the tool's own exit code; everything else is 1.
  pub fn exit_code(&self) -> i32 {
    match self {
      BuildError::ToolFailed { code: Some(code), .. } if *code != 0 => *code,
      _ => 1,
    }
  }
}

fn format_status(code: &Option<i32>) -> String {
  match code {
    Some(code) => format!("failed with exit code {code}"),
    None => "was terminated by a signal".to_string(),
  }
}

fn format_stderr(stderr: &str) -> String {
  let stderr = stderr.trim();
  if stderr.is_empty() {
    String::new()
  } else {
    format!("\n{stderr}")
  }
}
