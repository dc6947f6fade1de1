//! Terminal output for `onabuild`.
//!
//! Build summaries go to stdout and errors to stderr. Colour is only applied
//! when the target stream supports it.

use std::path::Path;
use std::time::Duration;

use owo_colors::{OwoColorize, Stream};

use onabuild_lib::execute::BuildStats;

const BUILT: &str = "✓";
const FAILED: &str = "✗";
const IDLE: &str = "•";

/// What a successful build that relinked something reports.
pub struct BuildSummary<'a> {
  pub module: &'a str,
  pub artifact: &'a Path,
  pub stats: BuildStats,
  pub elapsed: Duration,
}

impl BuildSummary<'_> {
  /// Label and value of each line under the heading, in print order.
  fn rows(&self) -> Vec<(&'static str, String)> {
    vec![
      ("Artifact", self.artifact.display().to_string()),
      ("Modules", self.stats.modules.to_string()),
      ("Compiled", self.stats.compiled.to_string()),
      ("Linked", self.stats.linked.to_string()),
      ("Duration", format_elapsed(self.elapsed)),
    ]
  }

  pub fn print(&self) {
    println!(
      "{} Built {}",
      BUILT.if_supports_color(Stream::Stdout, |s| s.green()),
      self.module
    );
    for (label, value) in self.rows() {
      println!("  {}: {}", label.if_supports_color(Stream::Stdout, |s| s.dimmed()), value);
    }
  }
}

/// Printed when no module in the graph needed relinking.
pub fn print_nothing_to_do() {
  println!(
    "{} Nothing to be done",
    IDLE.if_supports_color(Stream::Stdout, |s| s.blue())
  );
}

pub fn print_error(message: &str) {
  eprintln!(
    "{} {}",
    FAILED.if_supports_color(Stream::Stderr, |s| s.red()),
    message.if_supports_color(Stream::Stderr, |s| s.red())
  );
}

/// Milliseconds under a second, seconds with two decimals under a minute.
fn format_elapsed(elapsed: Duration) -> String {
  match elapsed.as_secs() {
    0 => format!("{}ms", elapsed.as_millis()),
    secs @ 1..60 => format!("{secs}.{:02}s", elapsed.subsec_millis() / 10),
    secs => format!("{}m {}s", secs / 60, secs % 60),
  }
}
