// ABOUTME: Release task command implementation.
// ABOUTME: Validates config, takes the release lock, and runs the orchestrator.

use crate::cli::TaskArgs;
use rollout::artifact::CommandInstaller;
use rollout::config::Config;
use rollout::diagnostics::{Diagnostics, Warning};
use rollout::error::Result;
use rollout::lock::ReleaseLock;
use rollout::output::Output;
use rollout::process::{DryRunRunner, ProcessRunner, SystemRunner};
use rollout::release::{Orchestrator, Task};
use rollout::service::CommandServiceController;
use std::sync::Arc;

/// Run `task` and its dependencies against the configured service.
pub async fn run_task(
    task: Task,
    config: Config,
    args: &TaskArgs,
    mut output: Output,
) -> Result<()> {
    output.start_timer();

    // Resolve everything the copy step needs before touching the service.
    let plan = if task.needs_artifact() {
        Some(config.release_plan(args.target_dir.as_deref())?)
    } else {
        None
    };

    let dry_run = args.dry_run.then(|| Arc::new(DryRunRunner::new()));
    let runner: Arc<dyn ProcessRunner> = match &dry_run {
        Some(recorder) => recorder.clone(),
        None => Arc::new(SystemRunner),
    };

    let controller = CommandServiceController::new(
        config.service.clone(),
        config.service_commands(),
        runner.clone(),
    );
    let installer = CommandInstaller::new(config.copy_command_line(), runner);
    let orchestrator = Orchestrator::new(&controller, &installer)
        .on_copy_failure(config.on_copy_failure)
        .verify_artifact(config.verify_artifact);

    let mut diag = Diagnostics::default();

    output.progress(&format!("Running {} for {}", task, config.service));

    let lock = if dry_run.is_some() {
        None
    } else {
        output.progress("  → Acquiring release lock...");
        Some(ReleaseLock::acquire(
            &config.lock.dir(),
            &config.service,
            args.force,
            config.lock.stale_after,
        )?)
    };

    let result = orchestrator.run(task, plan, &output, &mut diag).await;

    if let Some(lock) = lock
        && let Err(e) = lock.release()
    {
        diag.warn(Warning::lock_release(format!(
            "failed to release lock for {}: {}",
            config.service, e
        )));
    }

    if let Some(recorder) = &dry_run {
        for command in recorder.commands() {
            output.command(&command.to_string());
        }
    }

    // Emit collected warnings
    for warning in diag.warnings() {
        output.warning(&warning.message);
    }

    let report = result?;
    let steps: Vec<String> = report.completed.iter().map(|s| s.to_string()).collect();
    output.success(&format!("{} complete ({})", task, steps.join(" → ")));
    Ok(())
}
