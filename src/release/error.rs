// ABOUTME: Error types for release steps.
// ABOUTME: Each step failure keeps the underlying process error and its exit code.

use std::path::PathBuf;

use crate::process::ProcessError;
use crate::types::ServiceName;

/// Errors that can occur during release state transitions.
#[derive(Debug, thiserror::Error)]
pub enum ReleaseError {
    /// The artifact does not exist; nothing was stopped.
    #[error("artifact not found: {}", .0.display())]
    ArtifactMissing(PathBuf),

    /// The artifact path exists but is not a regular file.
    #[error("artifact is not a regular file: {}", .0.display())]
    ArtifactNotFile(PathBuf),

    #[error("failed to stop service {service}: {source}")]
    StopFailed {
        service: ServiceName,
        #[source]
        source: ProcessError,
    },

    #[error("failed to copy {} to {}: {source}", artifact.display(), target_dir.display())]
    CopyFailed {
        artifact: PathBuf,
        target_dir: PathBuf,
        #[source]
        source: ProcessError,
    },

    #[error("failed to start service {service}: {source}")]
    StartFailed {
        service: ServiceName,
        #[source]
        source: ProcessError,
    },
}

/// Error kind for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseErrorKind {
    ArtifactMissing,
    StopFailed,
    CopyFailed,
    StartFailed,
}

impl ReleaseError {
    pub fn kind(&self) -> ReleaseErrorKind {
        match self {
            ReleaseError::ArtifactMissing(_) | ReleaseError::ArtifactNotFile(_) => {
                ReleaseErrorKind::ArtifactMissing
            }
            ReleaseError::StopFailed { .. } => ReleaseErrorKind::StopFailed,
            ReleaseError::CopyFailed { .. } => ReleaseErrorKind::CopyFailed,
            ReleaseError::StartFailed { .. } => ReleaseErrorKind::StartFailed,
        }
    }

    /// The external command failure behind this error, if any.
    pub fn process_error(&self) -> Option<&ProcessError> {
        match self {
            ReleaseError::StopFailed { source, .. }
            | ReleaseError::CopyFailed { source, .. }
            | ReleaseError::StartFailed { source, .. } => Some(source),
            _ => None,
        }
    }

    /// Exit code of the failed command.
    pub fn exit_code(&self) -> Option<i32> {
        self.process_error().and_then(ProcessError::exit_code)
    }
}
