//! Shell execution of the compiler command.
//!
//! The command runs through the platform shell with the project root as its working
//! directory. Standard streams are inherited so compiler diagnostics reach the
//! terminal directly.

use std::path::Path;
use std::process::ExitStatus;

use tokio::process::Command;
use tracing::{debug, info};

use crate::error::{BuildError, Result};

/// Run `cmd` through the platform shell in `cwd` and wait for it to exit.
///
/// Returns an error if the shell cannot be spawned or the command exits with a
/// non-zero status.
pub async fn run_shell(cmd: &str, cwd: &Path) -> Result<()> {
  let (shell, flag) = get_shell();
  info!(cmd = %cmd, "executing command");
  debug!(shell = %shell, working_dir = ?cwd, "spawning process");

  let status = Command::new(shell)
    .arg(flag)
    .arg(cmd)
    .current_dir(cwd)
    .status()
    .await
    .map_err(|e| BuildError::Spawn {
      shell: shell.to_string(),
      source: e,
    })?;

  check_status(status)
}

fn check_status(status: ExitStatus) -> Result<()> {
  if status.success() {
    return Ok(());
  }
  debug!(status = %status, "command failed");
  Err(BuildError::BuildFailed { code: status.code() })
}

/// Shell and the flag that makes it run a command string.
fn get_shell() -> (&'static str, &'static str) {
  #[cfg(unix)]
  {
    ("/bin/sh", "-c")
  }

  #[cfg(windows)]
  {
    ("cmd.exe", "/C")
  }
}
