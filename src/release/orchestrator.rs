// ABOUTME: Runs a release task against a service controller and an artifact installer.
// ABOUTME: Fails fast on the first failing step and applies the copy failure policy.

use super::plan::ReleasePlan;
use super::release::Release;
use super::state::Stopped;
use super::task::{Step, Task};
use super::transitions;
use crate::artifact::ArtifactInstaller;
use crate::config::CopyFailurePolicy;
use crate::diagnostics::{Diagnostics, Warning};
use crate::error::{Error, Result};
use crate::output::Output;
use crate::service::ServiceController;

/// Steps that completed for a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseReport {
    pub task: Task,
    pub completed: Vec<Step>,
}

/// Sequences stop, copy, and start for a task.
///
/// Steps run one at a time and each waits for its command to exit. Running
/// the same task twice runs every step twice.
pub struct Orchestrator<'a> {
    controller: &'a dyn ServiceController,
    installer: &'a dyn ArtifactInstaller,
    on_copy_failure: CopyFailurePolicy,
    verify_artifact: bool,
}

impl<'a> Orchestrator<'a> {
    pub fn new(
        controller: &'a dyn ServiceController,
        installer: &'a dyn ArtifactInstaller,
    ) -> Self {
        Self {
            controller,
            installer,
            on_copy_failure: CopyFailurePolicy::default(),
            verify_artifact: true,
        }
    }

    pub fn on_copy_failure(mut self, policy: CopyFailurePolicy) -> Self {
        self.on_copy_failure = policy;
        self
    }

    pub fn verify_artifact(mut self, verify: bool) -> Self {
        self.verify_artifact = verify;
        self
    }

    /// Run `task` and its dependencies.
    ///
    /// `plan` is required whenever the task copies the artifact; without it
    /// the call fails with `Error::MissingTargetDir` before any command runs.
    pub async fn run(
        &self,
        task: Task,
        plan: Option<ReleasePlan>,
        output: &Output,
        diag: &mut Diagnostics,
    ) -> Result<ReleaseReport> {
        let steps = task.schedule();
        let mut report = ReleaseReport {
            task,
            completed: Vec::with_capacity(steps.len()),
        };

        if !steps.contains(&Step::Copy) {
            if steps.contains(&Step::Stop) {
                self.stop_only(output).await?;
                report.completed.push(Step::Stop);
            }
            return Ok(report);
        }

        let plan = plan.ok_or(Error::MissingTargetDir)?;
        if self.verify_artifact {
            plan.verify_artifact()?;
        }

        let release = Release::new(plan);

        output.progress(&format!("  → Stopping {}...", release.service()));
        let release = release.stop_service(self.controller).await?;
        report.completed.push(Step::Stop);

        output.progress(&format!(
            "  → Copying {} to {}...",
            release.artifact().display(),
            release.target_dir().display()
        ));
        let release = match release.copy_artifact(self.installer).await {
            Ok(release) => release,
            Err((stopped, e)) => {
                self.handle_copy_failure(stopped, output, diag).await;
                return Err(e.into());
            }
        };
        report.completed.push(Step::Copy);

        if !steps.contains(&Step::Start) {
            return Ok(report);
        }

        output.progress(&format!("  → Starting {}...", release.service()));
        let release = release.start_service(self.controller).await?;
        report.completed.push(Step::Start);

        let plan = release.finish();
        tracing::info!(
            "Released {} into {}",
            plan.artifact().display(),
            plan.target_dir().display()
        );

        Ok(report)
    }

    async fn stop_only(&self, output: &Output) -> Result<()> {
        let service = self.controller.service();
        output.progress(&format!("  → Stopping {}...", service));
        transitions::stop(self.controller, service).await?;
        Ok(())
    }

    async fn handle_copy_failure(
        &self,
        stopped: Release<Stopped>,
        output: &Output,
        diag: &mut Diagnostics,
    ) {
        let service = stopped.service().clone();
        match self.on_copy_failure {
            CopyFailurePolicy::LeaveStopped => {
                diag.warn(Warning::service_left_stopped(format!(
                    "service {} was stopped and has not been restarted",
                    service
                )));
            }
            CopyFailurePolicy::Restart => {
                output.progress(&format!(
                    "  → Restarting {} on the previous artifact...",
                    service
                ));
                if let Err(e) = stopped.restart_previous(self.controller).await {
                    diag.warn(Warning::restart_failed(format!(
                        "service {} is stopped: {}",
                        service, e
                    )));
                }
            }
        }
    }
}
