// ABOUTME: State transition methods for the release pipeline.
// ABOUTME: Each method consumes self and returns the next state on success.

use super::Release;
use super::error::ReleaseError;
use super::plan::ReleasePlan;
use super::state::{Copied, Idle, Started, Stopped};
use crate::artifact::ArtifactInstaller;
use crate::service::ServiceController;
use crate::types::ServiceName;

/// Result type for transitions that hand the previous state back on failure.
pub type TransitionResult<T, S> = Result<Release<T>, (Release<S>, ReleaseError)>;

impl Release<Idle> {
    /// Stop the running service.
    ///
    /// # Errors
    ///
    /// Returns `ReleaseError::StopFailed` if the stop command fails. Nothing
    /// else has run at that point.
    #[must_use = "release state must be used"]
    pub async fn stop_service<C: ServiceController + ?Sized>(
        self,
        controller: &C,
    ) -> Result<Release<Stopped>, ReleaseError> {
        stop(controller, self.service()).await?;
        Ok(self.transition(Stopped))
    }
}

/// Run the stop command for `service`. Also used by the stop-only task,
/// which has no plan to build a release from.
pub(super) async fn stop<C: ServiceController + ?Sized>(
    controller: &C,
    service: &ServiceName,
) -> Result<(), ReleaseError> {
    tracing::info!("Stopping service {}", service);
    controller
        .stop()
        .await
        .map_err(|source| ReleaseError::StopFailed {
            service: service.clone(),
            source,
        })
}

impl Release<Stopped> {
    /// Copy the artifact into the target directory, overwriting what is there.
    ///
    /// On failure the stopped release is returned with the error so the
    /// caller can decide whether to restart the service.
    pub async fn copy_artifact<I: ArtifactInstaller + ?Sized>(
        self,
        installer: &I,
    ) -> TransitionResult<Copied, Stopped> {
        tracing::info!(
            "Copying {} to {}",
            self.artifact().display(),
            self.target_dir().display()
        );
        match installer.install(self.artifact(), self.target_dir()).await {
            Ok(()) => Ok(self.transition(Copied)),
            Err(source) => {
                let err = ReleaseError::CopyFailed {
                    artifact: self.artifact().to_path_buf(),
                    target_dir: self.target_dir().to_path_buf(),
                    source,
                };
                Err((self, err))
            }
        }
    }

    /// Start the service again without a new artifact in place.
    ///
    /// This ends the release: the pipeline itself still failed.
    pub async fn restart_previous<C: ServiceController + ?Sized>(
        self,
        controller: &C,
    ) -> Result<ReleasePlan, ReleaseError> {
        tracing::warn!("Restarting {} on the previous artifact", self.service());
        controller
            .start()
            .await
            .map_err(|source| ReleaseError::StartFailed {
                service: self.service().clone(),
                source,
            })?;
        Ok(self.plan)
    }
}

impl Release<Copied> {
    /// Start the service. Success is the start command exiting zero.
    #[must_use = "release state must be used"]
    pub async fn start_service<C: ServiceController + ?Sized>(
        self,
        controller: &C,
    ) -> Result<Release<Started>, ReleaseError> {
        tracing::info!("Starting service {}", self.service());
        controller
            .start()
            .await
            .map_err(|source| ReleaseError::StartFailed {
                service: self.service().clone(),
                source,
            })?;
        Ok(self.transition(Started))
    }
}

impl Release<Started> {
    /// Terminal state; returns the plan that was released.
    pub fn finish(self) -> ReleasePlan {
        self.plan
    }
}
