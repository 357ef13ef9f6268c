// ABOUTME: Process runners: the real one backed by tokio::process and a recording dry run.
// ABOUTME: Both are used behind the ProcessRunner trait by controllers and installers.

use async_trait::async_trait;
use parking_lot::Mutex;
use snafu::ResultExt;
use std::process::Stdio;
use tokio::process::Command;

use super::command_line::CommandLine;
use super::error::{ExitSnafu, ProcessError, SpawnSnafu, TerminatedSnafu};

/// Captured result of a command that ran to completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// `None` when the process was terminated by a signal.
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }

    /// Turn a non-zero or signalled exit into an error.
    pub fn into_result(self, command: &CommandLine) -> Result<CommandOutput, ProcessError> {
        match self.exit_code {
            Some(0) => Ok(self),
            Some(code) => ExitSnafu {
                command: command.to_string(),
                code,
                stdout: self.stdout,
                stderr: self.stderr,
            }
            .fail(),
            None => TerminatedSnafu {
                command: command.to_string(),
                stdout: self.stdout,
                stderr: self.stderr,
            }
            .fail(),
        }
    }
}

/// Executes external commands.
#[async_trait]
pub trait ProcessRunner: Send + Sync {
    /// Run the command to completion and capture what it printed.
    ///
    /// Only failing to start the program is an error here; the exit status
    /// is reported in the output.
    async fn output(&self, command: &CommandLine) -> Result<CommandOutput, ProcessError>;

    /// Run the command and require a zero exit status.
    async fn run(&self, command: &CommandLine) -> Result<CommandOutput, ProcessError> {
        let output = self.output(command).await?;
        output.into_result(command)
    }
}

/// Runs commands on the local host.
///
/// There is no timeout: a command that never exits blocks the caller.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

#[async_trait]
impl ProcessRunner for SystemRunner {
    async fn output(&self, command: &CommandLine) -> Result<CommandOutput, ProcessError> {
        tracing::debug!("Running: {}", command);

        let output = Command::new(command.program())
            .args(command.arguments())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .context(SpawnSnafu {
                command: command.to_string(),
            })?;

        let result = CommandOutput {
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        };

        tracing::debug!("`{}` exited with {:?}", command, result.exit_code);
        Ok(result)
    }
}

/// Records commands instead of running them; every command succeeds.
#[derive(Debug, Default)]
pub struct DryRunRunner {
    commands: Mutex<Vec<CommandLine>>,
}

impl DryRunRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Commands seen so far, in call order.
    pub fn commands(&self) -> Vec<CommandLine> {
        self.commands.lock().clone()
    }
}

#[async_trait]
impl ProcessRunner for DryRunRunner {
    async fn output(&self, command: &CommandLine) -> Result<CommandOutput, ProcessError> {
        tracing::info!("Dry run: {}", command);
        self.commands.lock().push(command.clone());
        Ok(CommandOutput {
            exit_code: Some(0),
            stdout: String::new(),
            stderr: String::new(),
        })
    }
}
