//! Module build execution.
//!
//! This module provides the entry point for building a module and its
//! dependencies. It handles:
//! - Depth-first dependency resolution, building each module once per session
//! - Timestamp-based staleness checks (see [`crate::staleness`])
//! - Parallel compilation of stale sources (see [`compile`])
//! - Linking into the module's target type (see [`link`])
//!
//! Modules are visited one at a time; parallelism only exists between the
//! translation units of a single module.

pub mod compile;
pub mod link;
pub mod process;
pub mod types;

use std::collections::HashMap;

use tracing::{debug, info};

use crate::config::{ConfigError, ConfigProvider};
use crate::layout::ModuleLayout;
use crate::settings::BuildSettings;
use crate::staleness;

pub use link::LinkInputs;
pub use process::{ToolInvocation, run_tool};
pub use types::{BuildError, BuildResult, BuildStats, CompilationJob, DependencyArtifact};

/// State of one top-level build invocation.
///
/// Owns the set of modules already processed, so a module shared by several
/// dependents (a diamond) is built once and every dependent observes the same
/// [`BuildResult`]. Independent sessions share nothing.
pub struct BuildSession<P> {
  provider: P,
  settings: BuildSettings,
  processed: HashMap<String, BuildResult>,
  visiting: Vec<String>,
  stats: BuildStats,
}

impl<P: ConfigProvider> BuildSession<P> {
  pub fn new(provider: P, settings: BuildSettings) -> Self {
    Self {
      provider,
      settings,
      processed: HashMap::new(),
      visiting: Vec::new(),
      stats: BuildStats::default(),
    }
  }

  /// Modules built so far in this session.
  pub fn processed(&self) -> &HashMap<String, BuildResult> {
    &self.processed
  }

  pub fn stats(&self) -> BuildStats {
    self.stats
  }

  /// Build `module` after building its dependencies.
  ///
  /// # Errors
  ///
  /// - `BuildError::Config` if a configuration is missing or invalid, or if
  ///   the module depends on itself through its dependencies.
  /// - `BuildError::ToolFailed` on the first compiler or linker failure; the
  ///   module's artifact is not linked.
  pub async fn build(&mut self, module: &str) -> Result<BuildResult, BuildError> {
    if let Some(result) = self.processed.get(module) {
      debug!(module = %module, "reusing module built earlier in this session");
      return Ok(result.clone());
    }

    if self.visiting.iter().any(|name| name == module) {
      let mut chain = self.visiting.clone();
      chain.push(module.to_string());
      return Err(ConfigError::DependencyCycle { chain }.into());
    }

    self.visiting.push(module.to_string());
    let result = self.build_module(module).await;
    self.visiting.pop();

    let result = result?;
    self.processed.insert(module.to_string(), result.clone());
    Ok(result)
  }

  async fn build_module(&mut self, module: &str) -> Result<BuildResult, BuildError> {
    let config = self.provider.load(module)?;

    let mut dependency_rebuilt = false;
    let mut dependencies = Vec::new();

    for dependency in &config.dependencies {
      let result = Box::pin(self.build(dependency)).await?;
      dependency_rebuilt |= result.rebuilt;
      dependencies.push(result.artifact.clone());
      dependencies.extend(result.link_artifacts);
    }

    let link_artifacts = link_order(dependencies);

    info!(module = %module, target = %config.target_type, "building");
    self.stats.modules += 1;

    let module_dir = self.provider.module_dir(module);
    let layout = ModuleLayout::discover(&module_dir, &config.layout)?;
    let object_dir = self.settings.object_dir(module);
    let artifact_path = self
      .settings
      .output_dir
      .join(config.target_type.artifact_file_name(module));

    let report = staleness::assess(&layout, &object_dir, &artifact_path, dependency_rebuilt)?;

    debug!(
      module = %module,
      reason = %report.reason,
      stale = report.jobs.len(),
      sources = layout.sources.len(),
      "staleness checked"
    );

    if !report.jobs.is_empty() {
      self.stats.compiled += compile::compile_all(&report.jobs, &self.settings, config.target_type).await?;
    }

    if report.needs_rebuild {
      let inputs = LinkInputs {
        module,
        artifact: &artifact_path,
        objects: &report.objects,
        dependencies: &link_artifacts,
        libraries: &config.libraries,
      };
      config.target_type.link(&self.settings, &inputs).await?;
      self.stats.linked += 1;

      for orphan in &report.orphans {
        debug!(module = %module, object = %orphan.display(), "removing object of deleted source");
        match tokio::fs::remove_file(orphan).await {
          Ok(()) => {}
          Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
          Err(e) => return Err(e.into()),
        }
      }
    } else {
      info!(module = %module, "up to date");
    }

    Ok(BuildResult {
      rebuilt: report.needs_rebuild,
      artifact: DependencyArtifact {
        path: artifact_path,
        target_type: config.target_type,
      },
      link_artifacts,
    })
  }
}

/// De-duplicate artifacts keeping each one's last occurrence, so an archive
/// always follows every archive that needs it.
fn link_order(artifacts: Vec<DependencyArtifact>) -> Vec<DependencyArtifact> {
  let mut ordered: Vec<DependencyArtifact> = Vec::with_capacity(artifacts.len());
  for artifact in artifacts.into_iter().rev() {
    if !ordered.contains(&artifact) {
      ordered.push(artifact);
    }
  }
  ordered.reverse();
  ordered
}
