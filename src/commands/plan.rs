// ABOUTME: Plan command implementation.
// ABOUTME: Prints the scheduled steps of a task and the exact commands they would run.

use rollout::artifact::CommandInstaller;
use rollout::config::Config;
use rollout::error::Result;
use rollout::output::Output;
use rollout::process::DryRunRunner;
use rollout::release::{Step, Task};
use std::path::Path;
use std::sync::Arc;

pub fn plan(task: Task, config: Config, target_dir: Option<&Path>, output: Output) -> Result<()> {
    let release_plan = if task.needs_artifact() {
        Some(config.release_plan(target_dir)?)
    } else {
        None
    };

    let commands = config.service_commands();
    let installer =
        CommandInstaller::new(config.copy_command_line(), Arc::new(DryRunRunner::new()));

    output.success(&format!("{} for {}:", task, config.service));
    for (i, step) in task.schedule().into_iter().enumerate() {
        let command = match (step, &release_plan) {
            (Step::Stop, _) => commands.stop.clone(),
            (Step::Start, _) => commands.start.clone(),
            (Step::Copy, Some(plan)) => installer.command_for(plan.artifact(), plan.target_dir()),
            // needs_artifact() guarantees a plan whenever copy is scheduled
            (Step::Copy, None) => continue,
        };
        output.success(&format!("  {}. {:<5} {}", i + 1, step, command));
    }

    Ok(())
}
