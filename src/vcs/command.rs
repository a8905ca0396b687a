//! External command execution.
//!
//! [`CommandRunner`] is the process boundary of the crate. The pipeline and the
//! submodule workflows only describe commands as [`CommandSpec`] values, so tests
//! can substitute a recording runner for [`ShellRunner`].

use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use crate::error::CommandError;

/// A program invocation: program, arguments and working directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    pub current_dir: Option<PathBuf>,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            current_dir: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn current_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.current_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    fn to_command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args).stdin(Stdio::null());
        if let Some(dir) = &self.current_dir {
            cmd.current_dir(dir);
        }
        cmd
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

/// Runs external commands to completion.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Runs a command, streaming its output to the terminal.
    async fn run(&self, command: &CommandSpec) -> Result<(), CommandError>;

    /// Runs a command and returns its captured stdout.
    async fn capture(&self, command: &CommandSpec) -> Result<String, CommandError>;
}

/// [`CommandRunner`] backed by real child processes.
#[derive(Debug, Clone, Default)]
pub struct ShellRunner;

impl ShellRunner {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CommandRunner for ShellRunner {
    async fn run(&self, command: &CommandSpec) -> Result<(), CommandError> {
        debug!(command = %command, "Running command");

        let status = command
            .to_command()
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await
            .map_err(|source| CommandError::Spawn {
                command: command.to_string(),
                source,
            })?;

        if !status.success() {
            return Err(CommandError::NonZeroExit {
                command: command.to_string(),
                code: status.code(),
                stderr: String::new(),
            });
        }
        Ok(())
    }

    async fn capture(&self, command: &CommandSpec) -> Result<String, CommandError> {
        debug!(command = %command, "Capturing command output");

        let output = command
            .to_command()
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|source| CommandError::Spawn {
                command: command.to_string(),
                source,
            })?;

        if !output.status.success() {
            return Err(CommandError::NonZeroExit {
                command: command.to_string(),
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        String::from_utf8(output.stdout).map_err(|_| CommandError::InvalidOutput {
            command: command.to_string(),
        })
    }
}
