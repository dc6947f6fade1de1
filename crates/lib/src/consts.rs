//! Names and defaults shared across the crate.

pub const APP_NAME: &str = "onabuild";

/// Per-module configuration file, located inside the module directory.
pub const CONFIG_FILE_NAME: &str = "build.json";

/// Interface header of a folder-layout module.
pub const MODULE_HEADER: &str = "module.hpp";

pub const HEADER_DIR: &str = "header";
pub const SOURCE_DIR: &str = "source";

/// Subdirectory of the output directory holding per-module object trees.
pub const OBJECT_DIR: &str = "obj";

pub const HEADER_EXTENSION: &str = "hpp";
pub const SOURCE_EXTENSIONS: &[&str] = &["c", "cc", "cpp", "cxx"];
pub const OBJECT_EXTENSION: &str = "o";

pub const DEFAULT_COMPILER: &str = "clang++";
pub const DEFAULT_ARCHIVER: &str = "ar";
pub const DEFAULT_FLAGS: &[&str] = &["-g", "-fno-exceptions", "-std=c++17", "-I."];
pub const DEFAULT_OUTPUT_DIR: &str = "output";

/// Environment variables read by `BuildSettings::from_env`.
pub mod env {
  pub const COMPILER: &str = "ONABUILD_CC";
  pub const ARCHIVER: &str = "ONABUILD_AR";
  pub const FLAGS: &str = "ONABUILD_CFLAGS";
  pub const MODULES_DIR: &str = "ONABUILD_MODULES_DIR";
  pub const OUTPUT_DIR: &str = "ONABUILD_OUTPUT_DIR";
  pub const JOBS: &str = "ONABUILD_JOBS";
}
