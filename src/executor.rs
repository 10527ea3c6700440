//! Script persistence and execution
//!
//! The script is written to a fixed path, made executable and run to
//! completion under `bash` with stdio inherited. Passwords are handed over
//! through the child's environment only; see [`crate::script::secret_env`].

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;
use std::process::{Command, ExitStatus};

use crate::config::InstallConfig;
use crate::error::{InstallerError, Result};
use crate::script::secret_env;

/// Where the script lands unless overridden.
pub const DEFAULT_SCRIPT_PATH: &str = "/tmp/install.sh";

/// Outcome of one script run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScriptOutcome {
    /// Exit code (None if terminated by signal).
    pub exit_code: Option<i32>,
    /// Whether the script exited successfully (exit code 0).
    pub success: bool,
}

impl ScriptOutcome {
    fn from_status(status: ExitStatus) -> Self {
        Self {
            exit_code: status.code(),
            success: status.success(),
        }
    }

    /// Exit code for this process: the script's own, or 1 after a signal.
    pub fn process_exit_code(&self) -> i32 {
        self.exit_code.unwrap_or(1)
    }
}

/// Write `text` to `path` and mark it executable (0755).
pub fn write_script(path: &Path, text: &str) -> Result<()> {
    fs::write(path, text).map_err(|e| {
        InstallerError::script(format!("cannot write {}: {}", path.display(), e))
    })?;
    fs::set_permissions(path, fs::Permissions::from_mode(0o755)).map_err(|e| {
        InstallerError::script(format!("cannot make {} executable: {}", path.display(), e))
    })?;
    tracing::info!("Install script written to {}", path.display());
    Ok(())
}

/// Run the script at `path` and wait for it to finish.
pub fn run_script(path: &Path, config: &InstallConfig) -> Result<ScriptOutcome> {
    tracing::info!("Running {}", path.display());

    let mut cmd = Command::new("bash");
    cmd.arg(path);
    for (name, secret) in secret_env(config) {
        cmd.env(name, secret.expose());
    }
    let status = cmd.status().map_err(|e| {
        InstallerError::script(format!("failed to start {}: {}", path.display(), e))
    })?;

    let outcome = ScriptOutcome::from_status(status);
    if outcome.success {
        tracing::info!("Install script finished successfully");
    } else {
        tracing::error!("Install script failed: {}", status);
    }
    Ok(outcome)
}
