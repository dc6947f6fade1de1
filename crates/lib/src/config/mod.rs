//! Module configuration loading.
//!
//! Every module lives in its own directory under the modules root and declares
//! itself in a `build.json`:
//!
//! ```json
//! {
//!   "targetType": "executable",
//!   "dependencies": ["core"],
//!   "libraries": ["SDL2"],
//!   "modules": ["app", "graphics"]
//! }
//! ```
//!
//! The build session only sees modules through the [`ConfigProvider`] trait, so
//! tests can hand it configurations that never touch disk.

mod types;

use std::path::PathBuf;

use tracing::debug;

use crate::consts::CONFIG_FILE_NAME;

pub use types::{ConfigError, ModuleConfig, SourceLayout, TargetType};

/// Supplies module configurations and the directories their files live in.
pub trait ConfigProvider {
  /// Load the configuration of `module`.
  fn load(&self, module: &str) -> Result<ModuleConfig, ConfigError>;

  /// Directory holding the module's headers and sources.
  fn module_dir(&self, module: &str) -> PathBuf;
}

impl<P: ConfigProvider + ?Sized> ConfigProvider for &P {
  fn load(&self, module: &str) -> Result<ModuleConfig, ConfigError> {
    (**self).load(module)
  }

  fn module_dir(&self, module: &str) -> PathBuf {
    (**self).module_dir(module)
  }
}

/// Reads `<modules_dir>/<module>/build.json` from disk.
#[derive(Debug, Clone)]
pub struct JsonConfigProvider {
  modules_dir: PathBuf,
}

impl JsonConfigProvider {
  pub fn new(modules_dir: impl Into<PathBuf>) -> Self {
    Self {
      modules_dir: modules_dir.into(),
    }
  }

  /// Path of the configuration file for `module`.
  pub fn config_path(&self, module: &str) -> PathBuf {
    self.module_dir(module).join(CONFIG_FILE_NAME)
  }
}

impl ConfigProvider for JsonConfigProvider {
  fn load(&self, module: &str) -> Result<ModuleConfig, ConfigError> {
    let path = self.config_path(module);

    let text = std::fs::read_to_string(&path).map_err(|source| {
      if source.kind() == std::io::ErrorKind::NotFound {
        ConfigError::NotFound {
          module: module.to_string(),
          path: path.clone(),
        }
      } else {
        ConfigError::Read {
          module: module.to_string(),
          source,
        }
      }
    })?;

    let config = ModuleConfig::from_json(module, &text)?;
    debug!(
      module = %module,
      target = %config.target_type,
      dependencies = config.dependencies.len(),
      "loaded module config"
    );

    Ok(config)
  }

  fn module_dir(&self, module: &str) -> PathBuf {
    self.modules_dir.join(module)
  }
}
