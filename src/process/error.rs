// ABOUTME: Process error types with SNAFU context selectors.
// ABOUTME: Distinguishes spawn failures, non-zero exits, and signal termination.

use snafu::Snafu;

/// Failure of a single external command.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum ProcessError {
    #[snafu(display("failed to run `{command}`: {source}"))]
    Spawn {
        command: String,
        source: std::io::Error,
    },

    #[snafu(display("`{command}` exited with code {code}"))]
    Exit {
        command: String,
        code: i32,
        stdout: String,
        stderr: String,
    },

    #[snafu(display("`{command}` was terminated by a signal"))]
    Terminated {
        command: String,
        stdout: String,
        stderr: String,
    },
}

/// Error kind for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessErrorKind {
    /// The program could not be started (missing binary, permissions).
    Spawn,
    /// The program ran and exited non-zero.
    Exit,
    /// The program was killed before it could exit.
    Terminated,
}

impl ProcessError {
    pub fn kind(&self) -> ProcessErrorKind {
        match self {
            ProcessError::Spawn { .. } => ProcessErrorKind::Spawn,
            ProcessError::Exit { .. } => ProcessErrorKind::Exit,
            ProcessError::Terminated { .. } => ProcessErrorKind::Terminated,
        }
    }

    /// The command as it was rendered for the operator.
    pub fn command(&self) -> &str {
        match self {
            ProcessError::Spawn { command, .. }
            | ProcessError::Exit { command, .. }
            | ProcessError::Terminated { command, .. } => command,
        }
    }

    /// Exit code of the failed command, if it exited on its own.
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            ProcessError::Exit { code, .. } => Some(*code),
            _ => None,
        }
    }

    pub fn stdout(&self) -> &str {
        match self {
            ProcessError::Exit { stdout, .. } | ProcessError::Terminated { stdout, .. } => stdout,
            ProcessError::Spawn { .. } => "",
        }
    }

    pub fn stderr(&self) -> &str {
        match self {
            ProcessError::Exit { stderr, .. } | ProcessError::Terminated { stderr, .. } => stderr,
            ProcessError::Spawn { .. } => "",
        }
    }
}
