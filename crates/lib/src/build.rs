//! The build pipeline.
//!
//! [`plan`] resolves paths, reads the SDK location, scans the sources and assembles
//! the command line, in that order. [`run`] hands the finished command to the shell.
//! Planning has no side effects, so a failed plan leaves nothing behind.

use std::path::Path;

use serde::Serialize;
use tracing::info;

use crate::command::CommandLine;
use crate::error::Result;
use crate::execute::run_shell;
use crate::paths::ProjectPaths;
use crate::sources::{self, SourceFileSet};
use crate::target::BuildTarget;

/// Everything needed to run one compiler invocation.
#[derive(Debug, Clone, Serialize)]
pub struct BuildPlan {
  pub paths: ProjectPaths,
  pub sources: SourceFileSet,
  pub command: CommandLine,
}

/// Resolve `location` against `target` and assemble the compiler command.
pub fn plan(location: Option<&Path>, target: &BuildTarget) -> Result<BuildPlan> {
  let paths = ProjectPaths::resolve(location, target)?;
  info!(root = %paths.root.display(), sdk = %paths.sdk_root.display(), "resolved build paths");

  let sources = sources::collect(&paths.root, &target.source_dirs, &target.source_suffix)?;
  info!(count = sources.len(), "collected sources");

  let command = CommandLine::assemble(target, &paths, &sources);

  Ok(BuildPlan {
    paths,
    sources,
    command,
  })
}

/// Run the planned command from the project root and wait for the compiler to exit.
pub async fn run(plan: &BuildPlan) -> Result<()> {
  run_shell(&plan.command.render(), &plan.paths.root).await
}
