//! Test utilities for onabuild-lib.
//!
//! Module trees are written into temporary directories and built with a fake
//! toolchain: small `/bin/sh` scripts that record each invocation in a log file
//! and create the output file they were asked for. No real compiler is needed.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::consts::CONFIG_FILE_NAME;
use crate::settings::{BuildSettings, ToolCommand};

/// Write `content` to `path`, creating parent directories.
pub fn write_file(path: &Path, content: &str) {
  if let Some(parent) = path.parent() {
    std::fs::create_dir_all(parent).unwrap();
  }
  std::fs::write(path, content).unwrap();
}

/// Set the modification time of an existing file.
pub fn set_mtime(path: &Path, time: SystemTime) {
  let file = std::fs::File::options().write(true).open(path).unwrap();
  file.set_modified(time).unwrap();
}

/// Write `<modules_dir>/<module>/build.json`.
pub fn write_config(modules_dir: &Path, module: &str, json: &str) {
  write_file(&modules_dir.join(module).join(CONFIG_FILE_NAME), json);
}

/// Compiler stand-in. Fails with exit code 3 when any argument mentions
/// "broken" and sleeps for a second first when one mentions "late".
const FAKE_CC: &str = r#"
echo "cc $*" >> "$FAKE_TOOL_LOG"
out=""
prev=""
for arg in "$@"; do
  case "$arg" in
    *late*) sleep 1 ;;
  esac
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
echo "ar $*" >> "$FAKE_TOOL_LOG"
: > "$2"
"#;

/// Fake toolchain rooted in a scratch directory.
pub struct FakeToolchain {
  pub log: PathBuf,
  cc: PathBuf,
  ar: PathBuf,
}

impl FakeToolchain {
  pub fn install(dir: &Path) -> Self {
    let log = dir.join("tools.log");
    let cc = dir.join("fake-cc.sh");
    let ar = dir.join("fake-ar.sh");
    write_file(&cc, &FAKE_CC.replace("$FAKE_TOOL_LOG", &log.display().to_string()));
    write_file(&ar, &FAKE_AR.replace("$FAKE_TOOL_LOG", &log.display().to_string()));
    write_file(&log, "");
    Self { log, cc, ar }
  }

  /// Settings that build `modules_dir` into `output_dir` with the fake tools.
  pub fn settings(&self, modules_dir: &Path, output_dir: &Path) -> BuildSettings {
    BuildSettings {
      compiler: script_command(&self.cc),
      archiver: script_command(&self.ar),
      flags: vec!["-g".to_string()],
      modules_dir: modules_dir.to_path_buf(),
      output_dir: output_dir.to_path_buf(),
      jobs: 4,
    }
  }

  /// Every recorded invocation, oldest first.
  pub fn invocations(&self) -> Vec<String> {
    std::fs::read_to_string(&self.log)
      .unwrap()
      .lines()
      .map(str::to_string)
      .collect()
  }

  /// Compile invocations (`cc ... -c ...`).
  pub fn compiles(&self) -> Vec<String> {
    self
      .invocations()
      .into_iter()
      .filter(|line| line.starts_with("cc ") && line.split(' ').any(|arg| arg == "-c"))
      .collect()
  }

  /// Link and archive invocations.
  pub fn links(&self) -> Vec<String> {
    self
      .invocations()
      .into_iter()
      .filter(|line| line.starts_with("ar ") || !line.split(' ').any(|arg| arg == "-c"))
      .collect()
  }

  /// Forget everything recorded so far.
  pub fn clear(&self) {
    std::fs::write(&self.log, "").unwrap();
  }
}

/// Run a script through `/bin/sh` so it never has to be executable.
fn script_command(script: &Path) -> ToolCommand {
  ToolCommand {
    program: "/bin/sh".to_string(),
    args: vec![script.display().to_string()],
  }
}
