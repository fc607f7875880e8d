//! Source directory scanning.

use std::collections::HashSet;
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::debug;
use walkdir::WalkDir;

use crate::error::{BuildError, Result};

/// Project-relative source paths, in scan order, without duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SourceFileSet {
  files: Vec<PathBuf>,
  #[serde(skip)]
  seen: HashSet<PathBuf>,
}

impl SourceFileSet {
  /// Add a path, returning `false` if it was already present.
  fn insert(&mut self, path: PathBuf) -> bool {
    if !self.seen.insert(path.clone()) {
      return false;
    }
    self.files.push(path);
    true
  }

  pub fn files(&self) -> &[PathBuf] {
    &self.files
  }

  pub fn len(&self) -> usize {
    self.files.len()
  }

  pub fn is_empty(&self) -> bool {
    self.files.is_empty()
  }
}

impl<'a> IntoIterator for &'a SourceFileSet {
  type Item = &'a PathBuf;
  type IntoIter = std::slice::Iter<'a, PathBuf>;

  fn into_iter(self) -> Self::IntoIter {
    self.files.iter()
  }
}

/// Collect sources from each of `dirs` under `root`.
///
/// Only the immediate entries of each directory are listed. Entries are kept when
/// their name ends with `suffix` and are recorded relative to `root`, in the order the
/// directory listing yields them. A listed path that exists but is not a directory is
/// an error, like a missing one.
pub fn collect(root: &Path, dirs: &[PathBuf], suffix: &str) -> Result<SourceFileSet> {
  let mut set = SourceFileSet::default();

  for dir in dirs {
    let full_path = root.join(dir);
    debug!(dir = %full_path.display(), "scanning sources");

    if fs::metadata(&full_path).is_ok_and(|m| !m.is_dir()) {
      return Err(BuildError::NotADirectory { path: full_path });
    }

    for entry in WalkDir::new(&full_path).min_depth(1).max_depth(1) {
      let entry = entry.map_err(|e| BuildError::ScanDir {
        path: full_path.clone(),
        source: e,
      })?;

      let name = entry.file_name();
      if !has_suffix(name, suffix) {
        continue;
      }

      let relative = dir.join(name);
      if set.insert(relative.clone()) {
        debug!(source = %relative.display(), "collected source");
      }
    }
  }

  Ok(set)
}

/// Suffix match on the raw file name, so names that are not valid UTF-8 still match.
#[cfg(unix)]
fn has_suffix(name: &OsStr, suffix: &str) -> bool {
  use std::os::unix::ffi::OsStrExt;
  name.as_bytes().ends_with(suffix.as_bytes())
}

#[cfg(not(unix))]
fn has_suffix(name: &OsStr, suffix: &str) -> bool {
  name.to_string_lossy().ends_with(suffix)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::error::ErrorKind;
  use tempfile::TempDir;
  use tracing_test::traced_test;

  fn touch(root: &Path, relative: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, "").unwrap();
  }

  fn sorted(set: &SourceFileSet) -> Vec<PathBuf> {
    let mut files = set.files().to_vec();
    files.sort();
    files
  }

  #[test]
  fn keeps_only_files_with_suffix() {
    let temp = TempDir::new().unwrap();
    touch(temp.path(), "src/main.cpp");
    touch(temp.path(), "src/engine.cpp");
    touch(temp.path(), "src/readme.txt");
    touch(temp.path(), "src/engine.h");

    let set = collect(temp.path(), &[PathBuf::from("src")], ".cpp").unwrap();

    assert_eq!(
      sorted(&set),
      vec![PathBuf::from("src/engine.cpp"), PathBuf::from("src/main.cpp")]
    );
  }

  #[test]
  fn does_not_recurse_into_subdirectories() {
    let temp = TempDir::new().unwrap();
    touch(temp.path(), "lib/a.cpp");
    touch(temp.path(), "lib/nested/b.cpp");

    let set = collect(temp.path(), &[PathBuf::from("lib")], ".cpp").unwrap();

    assert_eq!(set.files(), &[PathBuf::from("lib/a.cpp")]);
  }

  #[test]
  fn directories_are_scanned_in_order() {
    let temp = TempDir::new().unwrap();
    touch(temp.path(), "b/second.cpp");
    touch(temp.path(), "a/first.cpp");
    touch(temp.path(), "other/ignored.cpp");

    let set = collect(temp.path(), &[PathBuf::from("b"), PathBuf::from("a")], ".cpp").unwrap();

    assert_eq!(
      set.files(),
      &[PathBuf::from("b/second.cpp"), PathBuf::from("a/first.cpp")]
    );
  }

  #[test]
  fn repeated_directory_does_not_duplicate_sources() {
    let temp = TempDir::new().unwrap();
    touch(temp.path(), "src/main.cpp");

    let dirs = [PathBuf::from("src"), PathBuf::from("src")];
    let set = collect(temp.path(), &dirs, ".cpp").unwrap();

    assert_eq!(set.len(), 1);
  }

  #[test]
  fn empty_directory_yields_no_sources() {
    let temp = TempDir::new().unwrap();
    fs::create_dir(temp.path().join("src")).unwrap();

    let set = collect(temp.path(), &[PathBuf::from("src")], ".cpp").unwrap();

    assert!(set.is_empty());
  }

  #[test]
  #[traced_test]
  fn collected_sources_are_logged() {
    let temp = TempDir::new().unwrap();
    touch(temp.path(), "src/main.cpp");

    collect(temp.path(), &[PathBuf::from("src")], ".cpp").unwrap();

    assert!(logs_contain("scanning sources"));
    assert!(logs_contain("collected source"));
  }

  #[test]
  fn regular_file_in_place_of_directory_is_file_system_error() {
    let temp = TempDir::new().unwrap();
    touch(temp.path(), "src");

    let err = collect(temp.path(), &[PathBuf::from("src")], ".cpp").unwrap_err();

    assert!(matches!(err, BuildError::NotADirectory { .. }));
    assert_eq!(err.kind(), ErrorKind::FileSystem);
  }

  #[test]
  #[cfg(target_os = "linux")]
  fn non_utf8_names_with_suffix_are_collected() {
    use std::os::unix::ffi::OsStrExt;

    let temp = TempDir::new().unwrap();
    let dir = temp.path().join("src");
    fs::create_dir(&dir).unwrap();
    let name = OsStr::from_bytes(b"caf\xe9.cpp");
    fs::write(dir.join(name), "").unwrap();
    fs::write(dir.join(OsStr::from_bytes(b"caf\xe9.txt")), "").unwrap();

    let set = collect(temp.path(), &[PathBuf::from("src")], ".cpp").unwrap();

    assert_eq!(set.files(), &[PathBuf::from("src").join(name)]);
  }

  #[test]
  fn missing_directory_is_file_system_error() {
    let temp = TempDir::new().unwrap();

    let err = collect(temp.path(), &[PathBuf::from("src")], ".cpp").unwrap_err();

    assert!(matches!(err, BuildError::ScanDir { .. }));
    assert_eq!(err.kind(), ErrorKind::FileSystem);
  }
}
