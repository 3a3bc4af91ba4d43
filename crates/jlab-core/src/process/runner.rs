//! Command specification and the system-backed runner.

use crate::error::{JlabError, Result};
use async_trait::async_trait;
use std::fmt;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

/// A subprocess invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    /// Executable name or path.
    pub program: String,
    /// Arguments, not including the program.
    pub args: Vec<String>,
    /// Capture stdout/stderr instead of passing them through to the terminal.
    pub capture: bool,
}

impl CommandSpec {
    /// Create a command whose output is captured.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            capture: true,
        }
    }

    /// Create a command from a filesystem path.
    pub fn from_path(program: &Path) -> Self {
        Self::new(program.to_string_lossy())
    }

    /// Append one argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append a path argument.
    pub fn path_arg(self, path: &Path) -> Self {
        self.arg(path.to_string_lossy())
    }

    /// Append several arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Let the child write directly to this process's stdout/stderr.
    ///
    /// Used for long-running conda operations whose progress the user
    /// should see.
    pub fn inherit_output(mut self) -> Self {
        self.capture = false;
        self
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            if arg.contains(' ') {
                write!(f, " \"{}\"", arg)?;
            } else {
                write!(f, " {}", arg)?;
            }
        }
        Ok(())
    }
}

/// Result of a finished subprocess.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code, `None` when the child was terminated by a signal.
    pub exit_code: Option<i32>,
    /// Captured stdout (empty when output was inherited).
    pub stdout: String,
    /// Captured stderr (empty when output was inherited).
    pub stderr: String,
}

impl CommandOutput {
    /// Successful output with the given stdout.
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            exit_code: Some(0),
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    /// Failed output with the given exit code and stderr.
    pub fn failed(exit_code: i32, stderr: impl Into<String>) -> Self {
        Self {
            exit_code: Some(exit_code),
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    /// Replace the captured stdout.
    pub fn with_stdout(mut self, stdout: impl Into<String>) -> Self {
        self.stdout = stdout.into();
        self
    }

    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }

    /// Turn a non-zero exit into [`JlabError::CommandFailed`].
    pub fn check(self, spec: &CommandSpec) -> Result<Self> {
        if self.success() {
            return Ok(self);
        }

        let mut output = self.stdout.trim_end().to_string();
        if !self.stderr.trim().is_empty() {
            if !output.is_empty() {
                output.push('\n');
            }
            output.push_str(self.stderr.trim_end());
        }

        Err(JlabError::CommandFailed {
            command: spec.to_string(),
            exit_code: self.exit_code.unwrap_or(1),
            output,
        })
    }
}

/// Executes subprocesses.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run a command to completion.
    ///
    /// A non-zero exit is reported through [`CommandOutput::exit_code`], not
    /// as an error; only failing to start the process is an error.
    async fn run(&self, spec: &CommandSpec) -> Result<CommandOutput>;
}

/// Runner backed by real processes.
#[derive(Debug, Clone, Default)]
pub struct SystemRunner;

impl SystemRunner {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CommandRunner for SystemRunner {
    async fn run(&self, spec: &CommandSpec) -> Result<CommandOutput> {
        debug!("Running {}", spec);

        let mut command = Command::new(&spec.program);
        command.args(&spec.args).stdin(Stdio::inherit());

        let spawn_error = |e: std::io::Error| JlabError::CommandSpawn {
            command: spec.to_string(),
            source: e,
        };

        if spec.capture {
            let output = command
                .stdout(Stdio::piped())
                .stderr(Stdio::piped())
                .output()
                .await
                .map_err(spawn_error)?;

            Ok(CommandOutput {
                exit_code: output.status.code(),
                stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            })
        } else {
            let status = command
                .stdout(Stdio::inherit())
                .stderr(Stdio::inherit())
                .status()
                .await
                .map_err(spawn_error)?;

            Ok(CommandOutput {
                exit_code: status.code(),
                ..CommandOutput::default()
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_display_quotes_spaces() {
        let spec = CommandSpec::new("/Applications/Google Chrome")
            .args(["--app=%s", "two words"]);

        assert_eq!(
            spec.to_string(),
            "/Applications/Google Chrome --app=%s \"two words\""
        );
    }

    #[test]
    fn test_check_success_passes_through() {
        let spec = CommandSpec::new("conda");
        let output = CommandOutput::ok("[]").check(&spec).unwrap();
        assert_eq!(output.stdout, "[]");
    }

    #[test]
    fn test_check_failure_carries_exit_code_and_output() {
        let spec = CommandSpec::new("conda").args(["install", "--yes", "menuinst"]);
        let err = CommandOutput::failed(3, "PackagesNotFoundError\n")
            .check(&spec)
            .unwrap_err();

        match err {
            JlabError::CommandFailed {
                command,
                exit_code,
                output,
            } => {
                assert_eq!(command, "conda install --yes menuinst");
                assert_eq!(exit_code, 3);
                assert_eq!(output, "PackagesNotFoundError");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_signal_terminated_is_failure() {
        let output = CommandOutput {
            exit_code: None,
            ..CommandOutput::default()
        };
        assert!(!output.success());
        let err = output.check(&CommandSpec::new("qlmanage")).unwrap_err();
        assert_eq!(err.exit_code(), 1);
    }

    #[tokio::test]
    async fn test_spawn_failure_is_error() {
        let runner = SystemRunner::new();
        let spec = CommandSpec::new("definitely-not-a-real-binary-7f3a");

        let err = runner.run(&spec).await.unwrap_err();
        assert!(matches!(err, JlabError::CommandSpawn { .. }));
    }
}
