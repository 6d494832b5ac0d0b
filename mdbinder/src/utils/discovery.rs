use std::path::{Path, PathBuf};

use log::{debug, info};
use mdbinder_config::Config;
use walkdir::WalkDir;

/// Collect Markdown files below `root`, sorted by path.
///
/// Only the top directory is searched unless `recursive` is set. Returned
/// paths are relative to `root`.
#[must_use]
pub fn discover_sources(root: &Path, recursive: bool) -> Vec<PathBuf> {
  let mut walker = WalkDir::new(root).follow_links(true);
  if !recursive {
    walker = walker.max_depth(1);
  }

  let mut files: Vec<PathBuf> = walker
    .into_iter()
    .filter_map(Result::ok)
    .filter(|entry| entry.file_type().is_file())
    .filter(|entry| {
      entry
        .path()
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("md"))
    })
    .filter_map(|entry| {
      entry.path().strip_prefix(root).ok().map(Path::to_path_buf)
    })
    .collect();

  files.sort();
  debug!("Discovered {} Markdown files in {}", files.len(), root.display());
  files
}

/// The sources of a build, relative to `root` where possible.
///
/// Configured files keep their order. Without configured files the
/// directory is searched.
#[must_use]
pub fn resolve_sources(config: &Config, root: &Path) -> Vec<PathBuf> {
  if config.files.is_empty() {
    info!("No files configured, searching {}", root.display());
    return discover_sources(root, config.recursive);
  }

  config
    .files
    .iter()
    .map(|path| {
      path
        .strip_prefix(root)
        .map_or_else(|_| path.clone(), Path::to_path_buf)
    })
    .collect()
}

#[cfg(test)]
mod tests {
  #![allow(clippy::unwrap_used, reason = "Fine in tests")]
  use std::fs;

  use tempfile::TempDir;

  use super::*;

  fn tree() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::create_dir_all(dir.path().join("sub")).unwrap();
    for file in ["b.md", "a.MD", "notes.txt", "sub/c.md"] {
      fs::write(dir.path().join(file), "x").unwrap();
    }
    dir
  }

  #[test]
  fn test_flat_discovery() {
    let dir = tree();
    assert_eq!(discover_sources(dir.path(), false), [
      PathBuf::from("a.MD"),
      PathBuf::from("b.md"),
    ]);
  }

  #[test]
  fn test_recursive_discovery() {
    let dir = tree();
    assert_eq!(discover_sources(dir.path(), true), [
      PathBuf::from("a.MD"),
      PathBuf::from("b.md"),
      PathBuf::from("sub/c.md"),
    ]);
  }

  #[test]
  fn test_configured_files_keep_order() {
    let dir = tree();
    let config = Config {
      files: vec![dir.path().join("sub/c.md"), PathBuf::from("a.MD")],
      ..Config::default()
    };
    assert_eq!(resolve_sources(&config, dir.path()), [
      PathBuf::from("sub/c.md"),
      PathBuf::from("a.MD"),
    ]);
  }
}
