// ABOUTME: Application-wide error types for rollout.
// ABOUTME: Uses thiserror for ergonomic error handling and maps errors to exit codes.

use std::path::PathBuf;
use thiserror::Error;

use crate::lock::LockError;
use crate::process::ProcessError;
use crate::release::ReleaseError;
use crate::types::ServiceName;

#[derive(Debug, Error)]
pub enum Error {
    #[error("file already exists: {0}")]
    AlreadyExists(PathBuf),

    #[error("configuration file not found in {0}")]
    ConfigNotFound(PathBuf),

    #[error("unknown destination: {0}")]
    UnknownDestination(String),

    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("no target directory configured (set target_dir or pass --target-dir)")]
    MissingTargetDir,

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Release(#[from] ReleaseError),

    #[error("failed to query status of {service}: {source}")]
    StatusFailed {
        service: ServiceName,
        #[source]
        source: ProcessError,
    },

    #[error(transparent)]
    Lock(#[from] LockError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl Error {
    /// Configuration problems are always detected before any command runs.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            Error::ConfigNotFound(_)
                | Error::UnknownDestination(_)
                | Error::MissingEnvVar(_)
                | Error::MissingTargetDir
                | Error::InvalidConfig(_)
                | Error::Yaml(_)
        )
    }

    /// Process exit status for this error: the failing command's own exit
    /// code when there is one, otherwise 1.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Release(e) => e.exit_code().filter(|code| *code != 0).unwrap_or(1),
            _ => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
