//! Implementation of the `onabuild <module>` command.
//!
//! Builds the named module and its dependencies, then prints a summary.

use std::time::Instant;

use anyhow::{Context, Result};
use tracing::debug;

use onabuild_lib::config::JsonConfigProvider;
use onabuild_lib::execute::BuildSession;
use onabuild_lib::settings::BuildSettings;

use crate::output::{BuildSummary, print_nothing_to_do};

/// Execute the build command.
///
/// Settings come from the `ONABUILD_*` environment variables. Prints
/// "Nothing to be done" when no module in the graph needed relinking.
pub fn cmd_build(module: &str) -> Result<()> {
  let start = Instant::now();

  let settings = BuildSettings::from_env().context("Invalid build settings")?;
  debug!(?settings, "resolved build settings");

  std::fs::create_dir_all(&settings.output_dir)
    .with_context(|| format!("Failed to create output directory: {}", settings.output_dir.display()))?;

  let provider = JsonConfigProvider::new(&settings.modules_dir);
  let mut session = BuildSession::new(provider, settings);

  let rt = tokio::runtime::Runtime::new().context("Failed to create async runtime")?;
  let result = rt
    .block_on(session.build(module))
    .with_context(|| format!("Failed to build {}", module))?;

  if !result.rebuilt {
    print_nothing_to_do();
    return Ok(());
  }

  BuildSummary {
    module,
    artifact: &result.artifact.path,
    stats: session.stats(),
    elapsed: start.elapsed(),
  }
  .print();

  Ok(())
}
