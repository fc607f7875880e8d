mod cmd;
mod output;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use wasmbuild_lib::BuildError;

use crate::cmd::{BuildOptions, cmd_build};
use crate::output::{OutputFormat, print_error};

/// wasmbuild - Build a C++ project for WebAssembly
#[derive(Parser)]
#[command(name = "wasmbuild")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Build location; its parent directory is the project root
  location: Option<PathBuf>,

  /// JSON file describing the build target (default: built-in Carnage3D target)
  #[arg(long, value_name = "FILE")]
  target: Option<PathBuf>,

  /// Compiler front end to invoke instead of the target's
  #[arg(long, value_name = "PROGRAM")]
  compiler: Option<String>,

  /// Print the command without running it
  #[arg(long)]
  dry_run: bool,

  /// Output format for the build plan
  #[arg(long, value_enum, default_value_t)]
  format: OutputFormat,

  /// Enable verbose output
  #[arg(short, long)]
  verbose: bool,
}

fn main() -> ExitCode {
  let cli = Cli::parse();

  let filter = if cli.verbose {
    EnvFilter::new("debug")
  } else {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
  };
  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .without_time()
    .init();

  let options = BuildOptions {
    location: cli.location,
    target: cli.target,
    compiler: cli.compiler,
    dry_run: cli.dry_run,
    format: cli.format,
  };

  match cmd_build(&options) {
    Ok(()) => ExitCode::SUCCESS,
    Err(err) => {
      print_error(&format!("{:#}", err));
      exit_code(&err)
    }
  }
}

/// Forward the compiler's exit code when it failed, 1 for everything else.
fn exit_code(err: &anyhow::Error) -> ExitCode {
  match err.downcast_ref::<BuildError>() {
    Some(BuildError::BuildFailed { code: Some(code) }) => ExitCode::from(u8::try_from(*code).unwrap_or(1)),
    _ => ExitCode::FAILURE,
  }
}
