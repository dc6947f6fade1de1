//! Timestamp-based staleness checks.
//!
//! Decides, for one module, whether its artifact must be regenerated and which
//! sources need recompiling. Rules, in priority order:
//!
//! 1. No artifact: every source is compiled.
//! 2. A header newer than the artifact: every source is compiled.
//! 3. Otherwise each source whose object is missing or older is compiled.
//! 4. Objects whose source was deleted mark the module for relinking; they are
//!    reported so the caller can remove them once the artifact is relinked.
//! 5. A rebuilt dependency marks the module for relinking without forcing any
//!    compilation.
//!
//! Object files that are not older than their source are reused as they are.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use tracing::trace;

use crate::execute::CompilationJob;
use crate::layout::{ModuleLayout, orphaned_objects};
use crate::util::fs::{is_newer_than, modified};

/// Why a module is (or is not) being rebuilt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StaleReason {
  MissingArtifact,
  HeaderChanged,
  SourcesChanged,
  SourcesRemoved,
  DependencyRebuilt,
  UpToDate,
}

impl fmt::Display for StaleReason {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let text = match self {
      StaleReason::MissingArtifact => "missing artifact",
      StaleReason::HeaderChanged => "header changed",
      StaleReason::SourcesChanged => "sources changed",
      StaleReason::SourcesRemoved => "sources removed",
      StaleReason::DependencyRebuilt => "dependency rebuilt",
      StaleReason::UpToDate => "up to date",
    };
    f.write_str(text)
  }
}

/// Outcome of checking one module.
#[derive(Debug, Clone)]
pub struct StalenessReport {
  /// Whether the artifact has to be linked again.
  pub needs_rebuild: bool,
  pub reason: StaleReason,
  /// Sources to compile.
  pub jobs: Vec<CompilationJob>,
  /// Every object of the module, stale or not, in source order.
  pub objects: Vec<PathBuf>,
  /// Objects in the object directory that no source produces any more.
  pub orphans: Vec<PathBuf>,
}

/// Check `layout` against the artifact at `artifact`.
pub fn assess(
  layout: &ModuleLayout,
  object_root: &Path,
  artifact: &Path,
  dependency_rebuilt: bool,
) -> io::Result<StalenessReport> {
  let all_jobs = layout.compilation_jobs(object_root);
  let objects: Vec<PathBuf> = all_jobs.iter().map(|job| job.object.clone()).collect();
  let orphans = orphaned_objects(object_root, &objects)?;

  let (reason, jobs) = match modified(artifact)? {
    None => (StaleReason::MissingArtifact, all_jobs),
    Some(artifact_time) => {
      if any_header_newer(&layout.headers, artifact_time)? {
        (StaleReason::HeaderChanged, all_jobs)
      } else {
        let stale = stale_sources(all_jobs)?;
        if !stale.is_empty() {
          (StaleReason::SourcesChanged, stale)
        } else if !orphans.is_empty() {
          trace!(count = orphans.len(), "objects without a source");
          (StaleReason::SourcesRemoved, stale)
        } else if dependency_rebuilt {
          (StaleReason::DependencyRebuilt, stale)
        } else {
          (StaleReason::UpToDate, stale)
        }
      }
    }
  };

  Ok(StalenessReport {
    needs_rebuild: reason != StaleReason::UpToDate || dependency_rebuilt,
    reason,
    jobs,
    objects,
    orphans,
  })
}

fn any_header_newer(headers: &[PathBuf], artifact_time: std::time::SystemTime) -> io::Result<bool> {
  for header in headers {
    if is_newer_than(header, artifact_time)? {
      trace!(header = %header.display(), "header newer than artifact");
      return Ok(true);
    }
  }
  Ok(false)
}

fn stale_sources(jobs: Vec<CompilationJob>) -> io::Result<Vec<CompilationJob>> {
  let mut stale = Vec::new();
  for job in jobs {
    let fresh = match (modified(&job.source)?, modified(&job.object)?) {
      (Some(source_time), Some(object_time)) => source_time <= object_time,
      _ => false,
    };
    if !fresh {
      trace!(source = %job.source.display(), "object missing or out of date");
      stale.push(job);
    }
  }
  Ok(stale)
}
