//! Compiler command line assembly.

use std::fmt;
use std::path::Path;

use serde::Serialize;

use crate::paths::ProjectPaths;
use crate::sources::SourceFileSet;
use crate::target::BuildTarget;

/// An ordered list of command tokens, rendered as one shell command string.
///
/// A token may hold a flag together with its value (`-o <path>`), matching how the
/// command reads when printed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandLine {
  tokens: Vec<String>,
}

impl CommandLine {
  /// Build the compiler invocation: program, sources, then the fixed flags.
  pub fn assemble(target: &BuildTarget, paths: &ProjectPaths, sources: &SourceFileSet) -> Self {
    let mut tokens = vec![target.compiler.clone()];

    tokens.extend(sources.into_iter().map(|p| quote(&p.to_string_lossy())));

    tokens.push(flag("-o", &paths.output));
    tokens.push(format!("-std={}", target.std));
    for setting in &target.settings {
      tokens.push(format!("-s {}", quote(setting)));
    }
    for include in &target.includes {
      tokens.push(flag("-I", include));
    }
    for include in paths.sdk_includes(target) {
      tokens.push(flag("-I", &include));
    }
    for dir in &target.preload {
      tokens.push(flag("--preload-file", dir));
    }

    Self { tokens }
  }

  pub fn tokens(&self) -> &[String] {
    &self.tokens
  }

  /// The command joined with single spaces.
  pub fn render(&self) -> String {
    self.tokens.join(" ")
  }
}

impl fmt::Display for CommandLine {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.render())
  }
}

fn flag(name: &str, value: &Path) -> String {
  format!("{} {}", name, quote(&value.to_string_lossy()))
}

/// Quote `value` for the platform shell if it contains anything the shell would
/// interpret.
#[cfg(unix)]
fn quote(value: &str) -> String {
  let plain = !value.is_empty()
    && value
      .chars()
      .all(|c| c.is_ascii_alphanumeric() || matches!(c, '/' | '.' | '_' | '-' | '+' | '=' | ':' | ',' | '@' | '%'));
  if plain {
    value.to_string()
  } else {
    format!("'{}'", value.replace('\'', r"'\''"))
  }
}

#[cfg(windows)]
fn quote(value: &str) -> String {
  if !value.is_empty() && !value.chars().any(|c| c.is_whitespace() || "&|<>^\"".contains(c)) {
    value.to_string()
  } else {
    format!("\"{}\"", value.replace('"', "\"\""))
  }
}
