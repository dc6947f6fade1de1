//! Toolchain and directory settings for a build.
//!
//! Defaults match the engine's historical build script (`clang++`, `ar`,
//! C++17 with exceptions disabled). Every field can be overridden through an
//! `ONABUILD_*` environment variable, see [`BuildSettings::from_env`].

use std::path::PathBuf;

use crate::config::ConfigError;
use crate::consts::{
  DEFAULT_ARCHIVER, DEFAULT_COMPILER, DEFAULT_FLAGS, DEFAULT_OUTPUT_DIR, OBJECT_DIR, env,
};

/// An external program plus any arguments that always precede the generated ones.
///
/// Parsed from a whitespace-separated string, so `ccache clang++` works as a compiler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCommand {
  pub program: String,
  pub args: Vec<String>,
}

impl ToolCommand {
  pub fn new(program: impl Into<String>) -> Self {
    Self {
      program: program.into(),
      args: Vec::new(),
    }
  }

  /// Split a command line on whitespace. Returns `None` for a blank string.
  pub fn parse(command: &str) -> Option<Self> {
    let mut parts = command.split_whitespace().map(str::to_string);
    let program = parts.next()?;
    Some(Self {
      program,
      args: parts.collect(),
    })
  }
}

/// Settings shared by every module of one build.
#[derive(Debug, Clone)]
pub struct BuildSettings {
  /// Compiler driver, also used to link shared libraries and executables.
  pub compiler: ToolCommand,

  /// Archiver for static libraries.
  pub archiver: ToolCommand,

  /// Flags passed to every compile and link invocation.
  pub flags: Vec<String>,

  /// Root containing one directory per module.
  pub modules_dir: PathBuf,

  /// Directory receiving artifacts and object files.
  pub output_dir: PathBuf,

  /// Maximum number of concurrent compile jobs per module.
  pub jobs: usize,
}

impl Default for BuildSettings {
  fn default() -> Self {
    Self {
      compiler: ToolCommand::new(DEFAULT_COMPILER),
      archiver: ToolCommand::new(DEFAULT_ARCHIVER),
      flags: DEFAULT_FLAGS.iter().map(|f| f.to_string()).collect(),
      modules_dir: PathBuf::from("."),
      output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
      jobs: num_cpus(),
    }
  }
}

impl BuildSettings {
  /// Defaults overridden by the `ONABUILD_*` environment variables that are set.
  pub fn from_env() -> Result<Self, ConfigError> {
    let mut settings = Self::default();

    if let Some(value) = read_var(env::COMPILER) {
      settings.compiler = ToolCommand::parse(&value).ok_or_else(|| invalid(env::COMPILER, &value))?;
    }
    if let Some(value) = read_var(env::ARCHIVER) {
      settings.archiver = ToolCommand::parse(&value).ok_or_else(|| invalid(env::ARCHIVER, &value))?;
    }
    if let Some(value) = read_var(env::FLAGS) {
      settings.flags = value.split_whitespace().map(str::to_string).collect();
    }
    if let Some(value) = read_var(env::MODULES_DIR) {
      settings.modules_dir = PathBuf::from(value);
    }
    if let Some(value) = read_var(env::OUTPUT_DIR) {
      settings.output_dir = PathBuf::from(value);
    }
    if let Some(value) = read_var(env::JOBS) {
      settings.jobs = match value.trim().parse::<usize>() {
        Ok(jobs) if jobs > 0 => jobs,
        _ => return Err(invalid(env::JOBS, &value)),
      };
    }

    Ok(settings)
  }

  /// Directory holding the object files of `module`.
  pub fn object_dir(&self, module: &str) -> PathBuf {
    self.output_dir.join(OBJECT_DIR).join(module)
  }
}

fn read_var(name: &str) -> Option<String> {
  std::env::var(name).ok()
}

fn invalid(var: &str, value: &str) -> ConfigError {
  ConfigError::InvalidEnv {
    var: var.to_string(),
    value: value.to_string(),
  }
}

/// Get the number of CPUs for default parallelism.
fn num_cpus() -> usize {
  std::thread::available_parallelism().map(|p| p.get()).unwrap_or(4)
}
