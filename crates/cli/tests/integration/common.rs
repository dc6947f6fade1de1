//! Shared test helpers for CLI integration tests.

use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use tempfile::TempDir;

/// Compiler stand-in: logs its arguments, fails with code 3 on any argument
/// mentioning "broken", otherwise creates the `-o` output.
const FAKE_CC: &str = r#"
echo "cc $*" >> "$LOG"
out=""
prev=""
for arg in "$@"; do
  case "$arg" in
    *broken*) echo "error: cannot compile $arg" >&2; exit 3 ;;
  esac
  if [ "$prev" = "-o" ]; then out="$arg"; fi
  prev="$arg"
done
if [ -n "$out" ]; then : > "$out"; fi
"#;

/// Archiver stand-in: `ar rcs <archive> <objects...>`.
const FAKE_AR: &str = r#"
echo "ar $*" >> "$LOG"
: > "$2"
"#;

/// Isolated test environment.
///
/// Each test gets its own modules directory, output directory and tool log.
pub struct TestEnv {
  pub temp: TempDir,
}

impl TestEnv {
  pub fn new() -> Self {
    let temp = TempDir::new().unwrap();
    let env = Self { temp };
    let log = env.log_path().display().to_string();
    env.write_file("tools/cc.sh", &FAKE_CC.replace("$LOG", &log));
    env.write_file("tools/ar.sh", &FAKE_AR.replace("$LOG", &log));
    env.write_file("tools.log", "");
    env
  }

  /// Write a file relative to the temp directory.
  pub fn write_file(&self, relative_path: &str, content: &str) {
    let path = self.temp.path().join(relative_path);
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, content).unwrap();
  }

  /// Add a folder-layout module with one header and the given sources.
  pub fn module(&self, name: &str, config: &str, sources: &[&str]) {
    self.write_file(&format!("modules/{name}/build.json"), config);
    self.write_file(&format!("modules/{name}/module.hpp"), "#pragma once\n");
    for source in sources {
      self.write_file(&format!("modules/{name}/source/{source}"), "int x;\n");
    }
  }

  /// Push a file's modification time into the future so it reads as edited.
  pub fn touch(&self, relative_path: &str) {
    let file = std::fs::File::options()
      .write(true)
      .open(self.temp.path().join(relative_path))
      .unwrap();
    file.set_modified(SystemTime::now() + Duration::from_secs(60)).unwrap();
  }

  pub fn modules_path(&self) -> PathBuf {
    let p = self.temp.path().join("modules");
    std::fs::create_dir_all(&p).unwrap();
    dunce::canonicalize(&p).unwrap_or(p)
  }

  pub fn output_path(&self) -> PathBuf {
    let p = self.temp.path().join("output");
    std::fs::create_dir_all(&p).unwrap();
    dunce::canonicalize(&p).unwrap_or(p)
  }

  pub fn log_path(&self) -> PathBuf {
    self.temp.path().join("tools.log")
  }

  /// Tool invocations recorded since the last `clear_log`.
  pub fn invocations(&self) -> Vec<String> {
    std::fs::read_to_string(self.log_path())
      .unwrap_or_default()
      .lines()
      .map(str::to_string)
      .collect()
  }

  pub fn clear_log(&self) {
    std::fs::write(self.log_path(), "").unwrap();
  }

  fn tool(&self, script: &str) -> String {
    format!("/bin/sh {}", tool_path(self.temp.path(), script).display())
  }

  /// Get a pre-configured Command for the onabuild binary.
  ///
  /// Sets environment variables for isolated testing:
  /// - `ONABUILD_CC` / `ONABUILD_AR`: the fake toolchain
  /// - `ONABUILD_CFLAGS`: a single `-g`
  /// - `ONABUILD_MODULES_DIR` / `ONABUILD_OUTPUT_DIR`: isolated paths
  pub fn onabuild_cmd(&self) -> Command {
    let mut cmd: Command = cargo_bin_cmd!("onabuild");
    cmd.env("ONABUILD_CC", self.tool("cc.sh"));
    cmd.env("ONABUILD_AR", self.tool("ar.sh"));
    cmd.env("ONABUILD_CFLAGS", "-g");
    cmd.env("ONABUILD_MODULES_DIR", self.modules_path());
    cmd.env("ONABUILD_OUTPUT_DIR", self.output_path());
    cmd.env_remove("ONABUILD_JOBS");
    cmd.env_remove("RUST_LOG");
    cmd
  }
}

fn tool_path(root: &Path, script: &str) -> PathBuf {
  root.join("tools").join(script)
}
