//! Module configuration records and their errors.

use std::fmt;
use std::path::PathBuf;

use serde::Deserialize;
use thiserror::Error;

/// The kind of artifact a module produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetType {
  StaticLib,
  SharedLib,
  Executable,
}

impl TargetType {
  pub const ALL: [TargetType; 3] = [TargetType::StaticLib, TargetType::SharedLib, TargetType::Executable];

  pub fn as_str(&self) -> &'static str {
    match self {
      TargetType::StaticLib => "static-lib",
      TargetType::SharedLib => "shared-lib",
      TargetType::Executable => "executable",
    }
  }

  /// Parse the `targetType` value used in `build.json`.
  pub fn parse(value: &str) -> Option<Self> {
    Self::ALL.into_iter().find(|t| t.as_str() == value)
  }
}

impl fmt::Display for TargetType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

/// Where a module keeps its headers and sources.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SourceLayout {
  /// `module.hpp`, `header/` and `source/` inside the module directory.
  #[default]
  Folder,
  /// Named sub-modules, each an optional `<name>.hpp`, `<name>.cpp` and `<name>/` folder.
  SubModules(Vec<String>),
}

/// Validated configuration of a single module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleConfig {
  pub target_type: TargetType,
  /// Dependency names in declaration order. Duplicates are not rejected.
  pub dependencies: Vec<String>,
  /// External libraries passed to the linker as `-l<name>`.
  pub libraries: Vec<String>,
  pub layout: SourceLayout,
}

impl ModuleConfig {
  pub fn new(target_type: TargetType) -> Self {
    Self {
      target_type,
      dependencies: Vec::new(),
      libraries: Vec::new(),
      layout: SourceLayout::Folder,
    }
  }

  pub fn with_dependencies<I, S>(mut self, dependencies: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.dependencies = dependencies.into_iter().map(Into::into).collect();
    self
  }

  /// Parse and validate the JSON text of a module's `build.json`.
  pub fn from_json(module: &str, text: &str) -> Result<Self, ConfigError> {
    let raw: RawModuleConfig = serde_json::from_str(text).map_err(|source| ConfigError::Parse {
      module: module.to_string(),
      source,
    })?;

    let target_type = raw.target_type.ok_or_else(|| ConfigError::MissingTargetType {
      module: module.to_string(),
    })?;

    let target_type = TargetType::parse(&target_type).ok_or_else(|| ConfigError::UnknownTargetType {
      module: module.to_string(),
      value: target_type.clone(),
    })?;

    Ok(Self {
      target_type,
      dependencies: raw.dependencies.unwrap_or_default(),
      libraries: raw.libraries.unwrap_or_default(),
      layout: raw.modules.map(SourceLayout::SubModules).unwrap_or_default(),
    })
  }
}

/// On-disk shape of `build.json`, before validation.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawModuleConfig {
  target_type: Option<String>,
  dependencies: Option<Vec<String>>,
  libraries: Option<Vec<String>>,
  modules: Option<Vec<String>>,
}

/// Errors raised while loading or validating module configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("no build.json exists for {module} (expected {})", .path.display())]
  NotFound { module: String, path: PathBuf },

  #[error("failed to read build.json for {module}: {source}")]
  Read {
    module: String,
    #[source]
    source: std::io::Error,
  },

  #[error("invalid build.json for {module}: {source}")]
  Parse {
    module: String,
    #[source]
    source: serde_json::Error,
  },

  #[error("no target type specified in build.json for {module}")]
  MissingTargetType { module: String },

  #[error("invalid target type {value:?} in build.json for {module} (expected static-lib, shared-lib or executable)")]
  UnknownTargetType { module: String, value: String },

  #[error("dependency cycle detected: {}", .chain.join(" -> "))]
  DependencyCycle { chain: Vec<String> },

  #[error("invalid value {value:?} for {var}")]
  InvalidEnv { var: String, value: String },
}
