//! Error types for wasmbuild-lib.

use std::path::PathBuf;

use thiserror::Error;

/// Broad failure category of a [`BuildError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
  /// A required argument, environment variable or target setting is missing or invalid.
  Configuration,
  /// A source directory or target file could not be read.
  FileSystem,
  /// The compiler could not be started or exited unsuccessfully.
  BuildFailure,
}

/// Errors that can occur while planning or running a build.
#[derive(Debug, Error)]
pub enum BuildError {
  #[error("no build location given")]
  MissingLocation,

  #[error("build location {} has no parent directory", path.display())]
  NoParent { path: PathBuf },

  #[error("failed to resolve build location {}: {source}", path.display())]
  Resolve { path: PathBuf, source: std::io::Error },

  #[error("environment variable {name} is not set")]
  MissingEnv { name: String },

  #[error("failed to read target file {}: {source}", path.display())]
  ReadTarget { path: PathBuf, source: std::io::Error },

  #[error("invalid target file {}: {source}", path.display())]
  ParseTarget { path: PathBuf, source: serde_json::Error },

  #[error("failed to scan source directory {}: {source}", path.display())]
  ScanDir { path: PathBuf, source: walkdir::Error },

  #[error("source path {} is not a directory", path.display())]
  NotADirectory { path: PathBuf },

  #[error("failed to spawn `{shell}`: {source}")]
  Spawn { shell: String, source: std::io::Error },

  #[error("compiler exited with {}", describe_exit(code))]
  BuildFailed { code: Option<i32> },
}

impl BuildError {
  pub fn kind(&self) -> ErrorKind {
    match self {
      BuildError::MissingLocation
      | BuildError::NoParent { .. }
      | BuildError::Resolve { .. }
      | BuildError::MissingEnv { .. }
      | BuildError::ParseTarget { .. } => ErrorKind::Configuration,
      BuildError::ReadTarget { .. } | BuildError::ScanDir { .. } | BuildError::NotADirectory { .. } => {
        ErrorKind::FileSystem
      }
      BuildError::Spawn { .. } | BuildError::BuildFailed { .. } => ErrorKind::BuildFailure,
    }
  }
}

fn describe_exit(code: &Option<i32>) -> String {
  match code {
    Some(code) => format!("exit code {}", code),
    None => "a signal".to_string(),
  }
}

pub type Result<T> = std::result::Result<T, BuildError>;
