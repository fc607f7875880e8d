//! Build target description.
//!
//! A [`BuildTarget`] lists everything that makes up one compiler invocation: which
//! directories hold the sources, which include paths and compiler settings apply, and
//! where the artifact goes. The default value describes the Carnage3D WebAssembly
//! build. A target can also be read from a JSON file, where every field is optional and
//! falls back to the default.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{BuildError, Result};

/// Directory holding the bundled Box2D sources, relative to the project root.
const BOX2D_DIR: &str = "third_party/Box2D/Box2D";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BuildTarget {
  /// Compiler front end, looked up through the shell.
  pub compiler: String,
  /// Value of the `-std=` flag.
  pub std: String,
  /// Artifact path relative to the project root.
  pub output: PathBuf,
  /// Environment variable naming the SDK root.
  pub sdk_env: String,
  /// Include directories relative to the SDK root.
  pub sdk_includes: Vec<PathBuf>,
  /// Include directories relative to the project root.
  pub includes: Vec<PathBuf>,
  /// Directories scanned for sources, in order, relative to the project root.
  pub source_dirs: Vec<PathBuf>,
  /// File name suffix of files handed to the compiler.
  pub source_suffix: String,
  /// Emscripten `-s` settings, in order.
  pub settings: Vec<String>,
  /// Directories bundled with `--preload-file`, relative to the project root.
  pub preload: Vec<PathBuf>,
}

impl Default for BuildTarget {
  fn default() -> Self {
    let box2d = Path::new(BOX2D_DIR);
    Self {
      compiler: "em++".to_string(),
      std: "c++11".to_string(),
      output: Path::new("bin").join("wasm").join("carnage3D.html"),
      sdk_env: "SDKDIR".to_string(),
      sdk_includes: vec![Path::new("GLM").join("include")],
      includes: vec![Path::new("third_party").join("Box2D")],
      source_dirs: vec![
        PathBuf::from("src"),
        box2d.join("Collision").join("Shapes"),
        box2d.join("Collision"),
        box2d.join("Common"),
        box2d.join("Dynamics").join("Contacts"),
        box2d.join("Dynamics").join("Joints"),
        box2d.join("Dynamics"),
      ],
      source_suffix: ".cpp".to_string(),
      settings: ["WASM=1", "USE_GLFW=3", "FULL_ES3=1", "EXIT_RUNTIME=1"]
        .into_iter()
        .map(String::from)
        .collect(),
      preload: vec![PathBuf::from("gamedata")],
    }
  }
}

impl BuildTarget {
  /// Load a target from a JSON file.
  pub fn from_file(path: &Path) -> Result<Self> {
    let content = fs::read_to_string(path).map_err(|e| BuildError::ReadTarget {
      path: path.to_path_buf(),
      source: e,
    })?;
    serde_json::from_str(&content).map_err(|e| BuildError::ParseTarget {
      path: path.to_path_buf(),
      source: e,
    })
  }

  /// Replace the compiler front end.
  pub fn with_compiler(mut self, compiler: impl Into<String>) -> Self {
    self.compiler = compiler.into();
    self
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::error::ErrorKind;
  use tempfile::TempDir;

  #[test]
  fn default_target_scans_app_and_box2d_sources() {
    let target = BuildTarget::default();
    assert_eq!(target.source_dirs.len(), 7);
    assert_eq!(target.source_dirs[0], PathBuf::from("src"));
    assert_eq!(target.source_dirs[6], Path::new(BOX2D_DIR).join("Dynamics"));
    assert_eq!(target.source_suffix, ".cpp");
    assert_eq!(target.sdk_env, "SDKDIR");
  }

  #[test]
  fn partial_file_falls_back_to_defaults() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("target.json");
    fs::write(&path, r#"{ "compiler": "clang++", "source_dirs": ["app"] }"#).unwrap();

    let target = BuildTarget::from_file(&path).unwrap();

    assert_eq!(target.compiler, "clang++");
    assert_eq!(target.source_dirs, vec![PathBuf::from("app")]);
    assert_eq!(target.std, BuildTarget::default().std);
    assert_eq!(target.settings, BuildTarget::default().settings);
  }

  #[test]
  fn unknown_field_is_a_configuration_error() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("target.json");
    fs::write(&path, r#"{ "compilr": "clang++" }"#).unwrap();

    let err = BuildTarget::from_file(&path).unwrap_err();
    assert!(matches!(err, BuildError::ParseTarget { .. }));
    assert_eq!(err.kind(), ErrorKind::Configuration);
  }

  #[test]
  fn missing_file_is_a_file_system_error() {
    let temp = TempDir::new().unwrap();
    let err = BuildTarget::from_file(&temp.path().join("nope.json")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::FileSystem);
  }

  #[test]
  fn with_compiler_overrides_front_end() {
    let target = BuildTarget::default().with_compiler("true");
    assert_eq!(target.compiler, "true");
  }
}
