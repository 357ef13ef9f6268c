// ABOUTME: Resolved inputs of a release: service, artifact, and target directory.
// ABOUTME: Built from config before anything runs so missing values fail early.

use std::path::{Path, PathBuf};

use super::error::ReleaseError;
use crate::types::ServiceName;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleasePlan {
    service: ServiceName,
    artifact: PathBuf,
    target_dir: PathBuf,
}

impl ReleasePlan {
    pub fn new(service: ServiceName, artifact: PathBuf, target_dir: PathBuf) -> Self {
        Self {
            service,
            artifact,
            target_dir,
        }
    }

    pub fn service(&self) -> &ServiceName {
        &self.service
    }

    pub fn artifact(&self) -> &Path {
        &self.artifact
    }

    pub fn target_dir(&self) -> &Path {
        &self.target_dir
    }

    /// Check the artifact is a regular file, so the service is never stopped
    /// without a replacement ready.
    pub fn verify_artifact(&self) -> Result<(), ReleaseError> {
        match std::fs::metadata(&self.artifact) {
            Ok(meta) if meta.is_file() => Ok(()),
            Ok(_) => Err(ReleaseError::ArtifactNotFile(self.artifact.clone())),
            Err(_) => Err(ReleaseError::ArtifactMissing(self.artifact.clone())),
        }
    }
}
