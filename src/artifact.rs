// ABOUTME: Installation of the built artifact into the deployment directory.
// ABOUTME: The default installer runs a privileged copy command; the destination is overwritten.

use async_trait::async_trait;
use snafu::ResultExt;
use std::io;
use std::path::Path;
use std::sync::Arc;

use crate::process::{CommandLine, ProcessError, ProcessRunner, SpawnSnafu};

/// Places a built artifact into the deployment directory.
#[async_trait]
pub trait ArtifactInstaller: Send + Sync {
    /// Copy `artifact` into `target_dir`, replacing any file of the same name.
    async fn install(&self, artifact: &Path, target_dir: &Path) -> Result<(), ProcessError>;
}

/// Installs by running `<copy command> <artifact> <target dir>`.
///
/// No backup of the replaced file is taken.
pub struct CommandInstaller {
    copy: CommandLine,
    runner: Arc<dyn ProcessRunner>,
}

impl CommandInstaller {
    /// `copy` is the complete command prefix, privilege included (`sudo cp`).
    pub fn new(copy: CommandLine, runner: Arc<dyn ProcessRunner>) -> Self {
        Self { copy, runner }
    }

    /// The exact command `install` would run.
    pub fn command_for(&self, artifact: &Path, target_dir: &Path) -> CommandLine {
        self.copy
            .clone()
            .arg(artifact.to_string_lossy())
            .arg(target_dir.to_string_lossy())
    }
}

#[async_trait]
impl ArtifactInstaller for CommandInstaller {
    async fn install(&self, artifact: &Path, target_dir: &Path) -> Result<(), ProcessError> {
        let command = self.command_for(artifact, target_dir);
        // A lossy path would send the copy somewhere else entirely.
        if artifact.to_str().is_none() || target_dir.to_str().is_none() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "path is not valid UTF-8",
            ))
            .context(SpawnSnafu {
                command: command.to_string(),
            });
        }
        self.runner.run(&command).await.map(|_| ())
    }
}
