// ABOUTME: Status command implementation.
// ABOUTME: Asks the service manager once whether the service is running.

use rollout::config::Config;
use rollout::error::{Error, Result};
use rollout::output::Output;
use rollout::process::SystemRunner;
use rollout::service::{CommandServiceController, ServiceController};
use std::sync::Arc;

pub async fn status(config: Config, output: Output) -> Result<()> {
    let controller = CommandServiceController::new(
        config.service.clone(),
        config.service_commands(),
        Arc::new(SystemRunner),
    );

    let status = controller
        .status()
        .await
        .map_err(|source| Error::StatusFailed {
            service: config.service.clone(),
            source,
        })?;

    output.success(&format!("{}: {}", config.service, status));
    Ok(())
}
