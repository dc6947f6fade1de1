//! Resolution of a module's layout descriptor into files on disk.
//!
//! A [`ModuleLayout`] lists the headers whose changes force a full rebuild and
//! the sources that compile into object files. Object paths mirror each
//! source's path relative to the module directory, so two distinct sources can
//! never share an object file.

use std::io;
use std::path::{Component, Path, PathBuf};

use walkdir::WalkDir;

use crate::config::SourceLayout;
use crate::consts::{HEADER_DIR, HEADER_EXTENSION, MODULE_HEADER, OBJECT_EXTENSION, SOURCE_DIR, SOURCE_EXTENSIONS};
use crate::execute::CompilationJob;

/// Concrete header and source files of one module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleLayout {
  /// The module directory.
  pub root: PathBuf,
  /// Interface files compared against the artifact.
  pub headers: Vec<PathBuf>,
  /// Translation units, sorted.
  pub sources: Vec<PathBuf>,
}

impl ModuleLayout {
  /// Scan `root` according to `layout`.
  ///
  /// Missing folders are treated as empty; a module without sources is valid.
  pub fn discover(root: &Path, layout: &SourceLayout) -> io::Result<Self> {
    let mut headers = Vec::new();
    let mut sources = Vec::new();

    match layout {
      SourceLayout::Folder => {
        let header = root.join(MODULE_HEADER);
        if header.is_file() {
          headers.push(header);
        }
        headers.extend(files_under(&root.join(HEADER_DIR), |_| true)?);
        sources.extend(files_under(&root.join(SOURCE_DIR), is_source)?);
      }
      SourceLayout::SubModules(names) => {
        for name in names {
          let header = root.join(format!("{name}.{HEADER_EXTENSION}"));
          if header.is_file() {
            headers.push(header);
          }
          for ext in SOURCE_EXTENSIONS {
            let source = root.join(format!("{name}.{ext}"));
            if source.is_file() {
              sources.push(source);
            }
          }
          sources.extend(files_under(&root.join(name), is_source)?);
        }
      }
    }

    sources.sort();
    sources.dedup();

    Ok(Self {
      root: root.to_path_buf(),
      headers,
      sources,
    })
  }

  /// Object file for `source` inside `object_root`.
  pub fn object_path(&self, object_root: &Path, source: &Path) -> PathBuf {
    object_path(object_root, &self.root, source)
  }

  /// One compilation job per source, in source order.
  pub fn compilation_jobs(&self, object_root: &Path) -> Vec<CompilationJob> {
    self
      .sources
      .iter()
      .map(|source| CompilationJob {
        source: source.clone(),
        object: self.object_path(object_root, source),
      })
      .collect()
  }
}

/// Derive the object path of `source`.
///
/// The source's path relative to `module_root` is kept whole and the full file
/// name gets an `.o` suffix: `source/gfx/app.cpp` becomes
/// `<object_root>/source/gfx/app.cpp.o`.
pub fn object_path(object_root: &Path, module_root: &Path, source: &Path) -> PathBuf {
  let relative = source.strip_prefix(module_root).unwrap_or(source);

  let mut path = object_root.to_path_buf();
  for component in relative.components() {
    if let Component::Normal(part) = component {
      path.push(part);
    }
  }

  let mut file_name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
  file_name.push(".");
  file_name.push(OBJECT_EXTENSION);
  path.set_file_name(file_name);
  path
}

/// Object files left in `object_root` by sources that no longer exist.
pub fn orphaned_objects(object_root: &Path, objects: &[PathBuf]) -> io::Result<Vec<PathBuf>> {
  let orphans = files_under(object_root, |path| {
    path.extension().is_some_and(|ext| ext == OBJECT_EXTENSION) && !objects.iter().any(|o| o == path)
  })?;
  Ok(orphans)
}

fn is_source(path: &Path) -> bool {
  path
    .extension()
    .and_then(|ext| ext.to_str())
    .is_some_and(|ext| SOURCE_EXTENSIONS.contains(&ext))
}

/// Regular files below `dir` matching `filter`, sorted. Empty if `dir` does not exist.
///
/// Symlinks are followed, so a linked file is listed under its link path and
/// its target's timestamp is what staleness checks see.
fn files_under(dir: &Path, filter: impl Fn(&Path) -> bool) -> io::Result<Vec<PathBuf>> {
  if !dir.is_dir() {
    return Ok(Vec::new());
  }

  let mut files = Vec::new();
  for entry in WalkDir::new(dir).follow_links(true).sort_by_file_name() {
    let entry = entry?;
    if entry.file_type().is_file() && filter(entry.path()) {
      files.push(entry.into_path());
    }
  }
  Ok(files)
}
