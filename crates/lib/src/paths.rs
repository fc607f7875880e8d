//! Project root and SDK resolution.

use std::path::{Component, Path, PathBuf};

use serde::Serialize;
use tracing::debug;

use crate::error::{BuildError, Result};
use crate::target::BuildTarget;

/// Absolute paths a build works against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectPaths {
  /// The build location as given, made absolute and normalized.
  pub location: PathBuf,
  /// Parent directory of `location`. All project-relative paths resolve against it.
  pub root: PathBuf,
  /// Root of the external SDK installation.
  pub sdk_root: PathBuf,
  /// Absolute path of the compiler output.
  pub output: PathBuf,
}

impl ProjectPaths {
  /// Resolve the project root from `location` and the SDK root from the environment.
  ///
  /// The location is resolved first, so a missing location is reported before a
  /// missing SDK variable. Nothing here touches the process working directory.
  pub fn resolve(location: Option<&Path>, target: &BuildTarget) -> Result<Self> {
    let location = location.ok_or(BuildError::MissingLocation)?;
    let (location, root) = project_root(location)?;
    let sdk_root = sdk_root(&target.sdk_env)?;
    let output = root.join(&target.output);

    Ok(Self {
      location,
      root,
      sdk_root,
      output,
    })
  }

  /// SDK include directories of `target`, made absolute.
  pub fn sdk_includes(&self, target: &BuildTarget) -> Vec<PathBuf> {
    target.sdk_includes.iter().map(|p| self.sdk_root.join(p)).collect()
  }
}

/// Make `location` absolute and return it together with its parent directory.
pub fn project_root(location: &Path) -> Result<(PathBuf, PathBuf)> {
  let absolute = absolute(location)?;
  let root = absolute
    .parent()
    .map(Path::to_path_buf)
    .ok_or_else(|| BuildError::NoParent { path: absolute.clone() })?;

  debug!(location = %absolute.display(), root = %root.display(), "resolved project root");
  Ok((absolute, root))
}

/// Read the SDK root from the environment variable `name`.
///
/// An empty value counts as unset.
pub fn sdk_root(name: &str) -> Result<PathBuf> {
  match std::env::var_os(name) {
    Some(value) if !value.is_empty() => Ok(PathBuf::from(value)),
    _ => Err(BuildError::MissingEnv { name: name.to_string() }),
  }
}

/// Canonicalize an existing path. Anything that cannot be canonicalized as a whole is
/// normalized lexically, with its parent canonicalized when that exists.
fn absolute(path: &Path) -> Result<PathBuf> {
  if let Ok(p) = dunce::canonicalize(path) {
    return Ok(p);
  }

  let lexical = std::path::absolute(path)
    .map(|p| normalize(&p))
    .map_err(|e| BuildError::Resolve {
      path: path.to_path_buf(),
      source: e,
    })?;

  match (lexical.parent(), lexical.file_name()) {
    (Some(parent), Some(name)) => Ok(
      dunce::canonicalize(parent)
        .map(|p| p.join(name))
        .unwrap_or_else(|_| lexical.clone()),
    ),
    _ => Ok(lexical),
  }
}

fn normalize(path: &Path) -> PathBuf {
  let mut out = PathBuf::new();
  for component in path.components() {
    match component {
      Component::CurDir => {}
      Component::ParentDir => {
        out.pop();
      }
      other => out.push(other.as_os_str()),
    }
  }
  out
}
