//! microk8s command execution
//!
//! Provides the command runner seam and the two invocations addon
//! management needs: `status -a <addon>` and `<enable|disable> <addon>`.
//! Output is handed back raw; interpreting it is the caller's job.

use crate::error::Microk8sError;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Where the microk8s snap installs its wrapper script
pub const DEFAULT_BINARY: &str = "/snap/bin/microk8s";

/// Captured result of one finished command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    /// Process exit code, -1 when the process was killed by a signal
    pub retcode: i32,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.retcode == 0
    }

    /// Stdout split into lines on `\n`, `\r` or `\r\n`
    ///
    /// Carriage-return progress updates come out as separate lines. A
    /// trailing line break does not produce an empty last line.
    pub fn stdout_lines(&self) -> Vec<String> {
        let text = self.stdout.replace("\r\n", "\n");
        let mut lines: Vec<String> = text.split(['\n', '\r']).map(str::to_string).collect();
        if text.is_empty() || text.ends_with(['\n', '\r']) {
            lines.pop();
        }
        lines
    }
}

/// Runs a command to completion and captures everything it printed
///
/// Blocks until the child exits. There is no timeout.
pub trait CommandRunner {
    fn run_all(&self, program: &Path, args: &[&str]) -> Result<CommandOutput, Microk8sError>;
}

impl<R: CommandRunner + ?Sized> CommandRunner for &R {
    fn run_all(&self, program: &Path, args: &[&str]) -> Result<CommandOutput, Microk8sError> {
        (**self).run_all(program, args)
    }
}

impl<R: CommandRunner + ?Sized> CommandRunner for Box<R> {
    fn run_all(&self, program: &Path, args: &[&str]) -> Result<CommandOutput, Microk8sError> {
        (**self).run_all(program, args)
    }
}

/// Runs commands as real child processes
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run_all(&self, program: &Path, args: &[&str]) -> Result<CommandOutput, Microk8sError> {
        let output = Command::new(program)
            .args(args)
            .output()
            .map_err(|source| Microk8sError::Spawn {
                command: command_line(program, args),
                source,
            })?;

        Ok(CommandOutput {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            retcode: output.status.code().unwrap_or(-1),
        })
    }
}

/// Render a command the way a shell user would type it
pub fn command_line(program: &Path, args: &[&str]) -> String {
    let mut line = program.display().to_string();
    for arg in args {
        line.push(' ');
        line.push_str(arg);
    }
    line
}

/// Check that `binary` exists and is executable
pub fn probe(binary: &Path) -> Result<(), Microk8sError> {
    if is_executable(binary) {
        Ok(())
    } else {
        Err(Microk8sError::BinaryNotFound(binary.to_path_buf()))
    }
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    match std::fs::metadata(path) {
        Ok(meta) => meta.is_file() && meta.permissions().mode() & 0o111 != 0,
        Err(_) => false,
    }
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

/// Handle to a microk8s installation
#[derive(Debug, Clone)]
pub struct Microk8s<R> {
    binary: PathBuf,
    runner: R,
}

impl<R: CommandRunner> Microk8s<R> {
    /// Probe `binary` and wrap it
    ///
    /// Fails with [`Microk8sError::BinaryNotFound`] if the binary is absent,
    /// so a handle always points at something runnable.
    pub fn new(binary: impl Into<PathBuf>, runner: R) -> Result<Self, Microk8sError> {
        let binary = binary.into();
        probe(&binary)?;
        Ok(Self { binary, runner })
    }

    /// Wrap `binary` without probing it
    pub fn unchecked(binary: impl Into<PathBuf>, runner: R) -> Self {
        Self {
            binary: binary.into(),
            runner,
        }
    }

    /// Query one addon
    ///
    /// Executes: microk8s status -a <addon>
    pub fn addon_status(&self, addon: &str) -> Result<CommandOutput, Microk8sError> {
        self.exec(&["status", "-a", addon])
    }

    /// Enable one addon
    ///
    /// Executes: microk8s enable <addon>
    pub fn enable(&self, addon: &str) -> Result<CommandOutput, Microk8sError> {
        self.exec(&["enable", addon])
    }

    /// Disable one addon
    ///
    /// Executes: microk8s disable <addon>
    pub fn disable(&self, addon: &str) -> Result<CommandOutput, Microk8sError> {
        self.exec(&["disable", addon])
    }

    fn exec(&self, args: &[&str]) -> Result<CommandOutput, Microk8sError> {
        tracing::debug!("running {}", command_line(&self.binary, args));
        self.runner.run_all(&self.binary, args)
    }
}
