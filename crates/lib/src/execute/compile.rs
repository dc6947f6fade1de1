//! Parallel compilation of a module's stale translation units.
//!
//! Each job runs as its own task in a `JoinSet`, throttled by a semaphore sized
//! to `BuildSettings::jobs`. The pool lives for a single call: it is created
//! when a module's jobs are submitted and dropped once they are collected.

use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, error, info};

use crate::config::TargetType;
use crate::execute::process::{ToolInvocation, run_tool};
use crate::execute::types::{BuildError, CompilationJob};
use crate::settings::BuildSettings;

/// Command line compiling `job` for a module of type `target_type`.
pub fn compile_invocation(settings: &BuildSettings, target_type: TargetType, job: &CompilationJob) -> ToolInvocation {
  let mut invocation = ToolInvocation::from_tool(&settings.compiler).args(settings.flags.iter().cloned());

  if target_type == TargetType::SharedLib {
    invocation = invocation.arg("-fPIC");
  }

  invocation
    .arg("-c")
    .arg(job.source.display().to_string())
    .arg("-o")
    .arg(job.object.display().to_string())
}

/// Compile every job and wait for all of them.
///
/// Returns the number of jobs compiled. The first failure collected is
/// returned immediately: queued jobs never start, compilers already running
/// are left to finish on their own, and objects they produce stay on disk.
pub async fn compile_all(
  jobs: &[CompilationJob],
  settings: &BuildSettings,
  target_type: TargetType,
) -> Result<usize, BuildError> {
  if jobs.is_empty() {
    return Ok(0);
  }

  for job in jobs {
    if let Some(parent) = job.object.parent() {
      tokio::fs::create_dir_all(parent).await?;
    }
  }

  // More permits than jobs would never be used.
  let workers = settings.jobs.clamp(1, jobs.len());
  let semaphore = Arc::new(Semaphore::new(workers));
  let mut join_set = JoinSet::new();

  debug!(jobs = jobs.len(), workers, "submitting compile jobs");

  for job in jobs {
    let invocation = compile_invocation(settings, target_type, job);
    let source = job.source.clone();
    let semaphore = semaphore.clone();

    join_set.spawn(async move {
      let _permit = semaphore
        .acquire_owned()
        .await
        .map_err(|e| BuildError::TaskFailed(e.to_string()))?;

      info!(source = %source.display(), "compiling");
      run_tool(&invocation).await?;

      Ok::<_, BuildError>(source)
    });
  }

  let mut compiled = 0;

  while let Some(join_result) = join_set.join_next().await {
    match join_result {
      Ok(Ok(source)) => {
        debug!(source = %source.display(), "compiled");
        compiled += 1;
      }
      Ok(Err(e)) => {
        error!(error = %e, "compilation failed");
        return Err(e);
      }
      Err(e) => {
        error!(error = %e, "compile task panicked");
        return Err(BuildError::TaskFailed(e.to_string()));
      }
    }
  }

  Ok(compiled)
}
