//! Implementation of the build command.
//!
//! Plans the build, prints the resolved paths and the compiler command line, and
//! runs the compiler unless this is a dry run.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{Context, Result, bail};
use serde::Serialize;
use tracing::debug;

use wasmbuild_lib::sources::SourceFileSet;
use wasmbuild_lib::{BuildPlan, BuildTarget, plan, run};

use crate::output::{OutputFormat, format_duration, print_json, print_success};

pub struct BuildOptions {
  /// Build location; its parent is the project root
  pub location: Option<PathBuf>,
  /// Target file replacing the built-in target
  pub target: Option<PathBuf>,
  /// Compiler override
  pub compiler: Option<String>,
  pub dry_run: bool,
  pub format: OutputFormat,
}

/// JSON view of a build plan.
#[derive(Serialize)]
struct PlanReport<'a> {
  root: &'a Path,
  sdk_root: &'a Path,
  output: &'a Path,
  sources: &'a SourceFileSet,
  tokens: &'a [String],
  command_line: String,
}

impl<'a> From<&'a BuildPlan> for PlanReport<'a> {
  fn from(plan: &'a BuildPlan) -> Self {
    Self {
      root: &plan.paths.root,
      sdk_root: &plan.paths.sdk_root,
      output: &plan.paths.output,
      sources: &plan.sources,
      tokens: plan.command.tokens(),
      command_line: plan.command.render(),
    }
  }
}

/// Execute the build command.
///
/// # Errors
///
/// Returns an error if the target file, build location, SDK variable or a source
/// directory is invalid, or if the compiler fails. JSON output is only available for
/// dry runs, since the compiler writes to the same stdout.
pub fn cmd_build(options: &BuildOptions) -> Result<()> {
  if options.format.is_json() && !options.dry_run {
    bail!("--format json requires --dry-run");
  }

  let mut target = match &options.target {
    Some(path) => BuildTarget::from_file(path).context("Failed to load build target")?,
    None => BuildTarget::default(),
  };
  if let Some(compiler) = &options.compiler {
    target = target.with_compiler(compiler.clone());
  }
  debug!(compiler = %target.compiler, dirs = target.source_dirs.len(), "loaded build target");

  let plan = plan(options.location.as_deref(), &target).context("Failed to plan build")?;

  if options.format.is_json() {
    print_json(&PlanReport::from(&plan))?;
  } else {
    println!("SDK: {}", plan.paths.sdk_root.display());
    println!("Root: {}", plan.paths.root.display());
    println!("{}", plan.command);
  }

  if options.dry_run {
    return Ok(());
  }

  let rt = tokio::runtime::Builder::new_current_thread()
    .enable_all()
    .build()
    .context("Failed to create async runtime")?;

  let started = Instant::now();
  rt.block_on(run(&plan)).context("Build failed")?;

  print_success(&built_message(&plan.paths.output, started.elapsed()));

  Ok(())
}

fn built_message(output: &Path, elapsed: Duration) -> String {
  format!("Built {} in {}", output.display(), format_duration(elapsed))
}
