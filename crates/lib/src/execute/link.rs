//! Linking, one variant per target type.
//!
//! | Target      | Artifact      | Action                                              |
//! |-------------|---------------|-----------------------------------------------------|
//! | static-lib  | `<name>.a`    | archiver `rcs` over the module's objects            |
//! | shared-lib  | `lib<name>.so`| compiler driver with `-shared`                      |
//! | executable  | `<name>`      | compiler driver over objects, deps and `-l` libs    |
//!
//! Shared-library dependencies are linked by search path and name (`-L`/`-l`)
//! so the dynamic linker resolves them; other dependencies by path.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::config::TargetType;
use crate::execute::process::{ToolInvocation, run_tool};
use crate::execute::types::{BuildError, DependencyArtifact};
use crate::settings::BuildSettings;

/// Everything a link step consumes.
#[derive(Debug, Clone, Copy)]
pub struct LinkInputs<'a> {
  pub module: &'a str,
  pub artifact: &'a Path,
  pub objects: &'a [PathBuf],
  pub dependencies: &'a [DependencyArtifact],
  pub libraries: &'a [String],
}

impl TargetType {
  /// File name of the artifact a module called `module` produces.
  pub fn artifact_file_name(&self, module: &str) -> String {
    match self {
      TargetType::StaticLib => format!("{module}.a"),
      TargetType::SharedLib => format!("lib{module}.so"),
      TargetType::Executable => module.to_string(),
    }
  }

  /// Human-readable artifact kind, used in progress output.
  pub fn description(&self) -> &'static str {
    match self {
      TargetType::StaticLib => "static library",
      TargetType::SharedLib => "shared library",
      TargetType::Executable => "executable",
    }
  }

  /// Command line producing the artifact.
  pub fn link_invocation(&self, settings: &BuildSettings, inputs: &LinkInputs<'_>) -> ToolInvocation {
    let objects = inputs.objects.iter().map(|p| p.display().to_string());

    match self {
      TargetType::StaticLib => ToolInvocation::from_tool(&settings.archiver)
        .arg("rcs")
        .arg(inputs.artifact.display().to_string())
        .args(objects),
      TargetType::SharedLib => ToolInvocation::from_tool(&settings.compiler)
        .arg("-shared")
        .args(objects)
        .args(inputs.dependencies.iter().flat_map(dependency_args))
        .arg("-o")
        .arg(inputs.artifact.display().to_string())
        .args(settings.flags.iter().cloned())
        .args(inputs.libraries.iter().map(|lib| format!("-l{lib}"))),
      TargetType::Executable => ToolInvocation::from_tool(&settings.compiler)
        .args(objects)
        .args(inputs.dependencies.iter().flat_map(dependency_args))
        .arg("-o")
        .arg(inputs.artifact.display().to_string())
        .args(settings.flags.iter().cloned())
        .args(inputs.libraries.iter().map(|lib| format!("-l{lib}"))),
    }
  }

  /// Produce the artifact, failing if the tool exits non-zero.
  pub async fn link(&self, settings: &BuildSettings, inputs: &LinkInputs<'_>) -> Result<(), BuildError> {
    info!(module = %inputs.module, kind = self.description(), "linking");

    if let Some(parent) = inputs.artifact.parent()
      && !parent.as_os_str().is_empty()
    {
      tokio::fs::create_dir_all(parent).await?;
    }

    // `ar rcs` updates an existing archive in place; start over so objects of
    // deleted sources do not linger.
    if *self == TargetType::StaticLib {
      match tokio::fs::remove_file(inputs.artifact).await {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => return Err(e.into()),
      }
    }

    run_tool(&self.link_invocation(settings, inputs)).await?;
    Ok(())
  }
}

/// Linker arguments referencing one dependency artifact.
fn dependency_args(dependency: &DependencyArtifact) -> Vec<String> {
  match dependency.target_type {
    TargetType::SharedLib => {
      let dir = dependency
        .path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
      vec![format!("-L{}", dir.display()), format!("-l{}", shared_lib_name(&dependency.path))]
    }
    TargetType::StaticLib | TargetType::Executable => vec![dependency.path.display().to_string()],
  }
}

/// `output/libcore.so` -> `core`.
fn shared_lib_name(path: &Path) -> String {
  let stem = path.file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or_default();
  match stem.strip_prefix("lib") {
    Some(name) => name.to_string(),
    None => stem,
  }
}
