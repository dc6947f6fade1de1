//! Filesystem helpers.

use std::io;
use std::path::Path;
use std::time::SystemTime;

/// Modification time of `path`, or `None` if nothing exists there.
pub fn modified(path: &Path) -> io::Result<Option<SystemTime>> {
  match std::fs::metadata(path) {
    Ok(metadata) => metadata.modified().map(Some),
    Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
    Err(e) => Err(e),
  }
}

/// Returns true if `path` exists and was modified strictly after `reference`.
pub fn is_newer_than(path: &Path, reference: SystemTime) -> io::Result<bool> {
  Ok(modified(path)?.is_some_and(|time| time > reference))
}
