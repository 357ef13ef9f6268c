// ABOUTME: Service controller that shells out to the service manager.
// ABOUTME: Builds privileged sysv or systemd command lines, with per-action overrides.

use async_trait::async_trait;
use std::sync::Arc;

use super::{ServiceAction, ServiceController, ServiceStatus};
use crate::config::{CommandOverrides, ServiceManager};
use crate::process::{CommandLine, ProcessError, ProcessRunner};
use crate::types::ServiceName;

/// Fully resolved command lines for each service action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceCommands {
    pub stop: CommandLine,
    pub start: CommandLine,
    pub status: CommandLine,
}

impl ServiceCommands {
    pub fn new(
        manager: ServiceManager,
        service: &ServiceName,
        privilege: &[String],
        overrides: &CommandOverrides,
    ) -> Self {
        let build = |action: ServiceAction, custom: &Option<CommandLine>| {
            custom
                .clone()
                .unwrap_or_else(|| manager.command(service, action))
                .with_prefix(privilege)
        };

        Self {
            stop: build(ServiceAction::Stop, &overrides.stop),
            start: build(ServiceAction::Start, &overrides.start),
            status: build(ServiceAction::Status, &overrides.status),
        }
    }

    pub fn for_action(&self, action: ServiceAction) -> &CommandLine {
        match action {
            ServiceAction::Stop => &self.stop,
            ServiceAction::Start => &self.start,
            ServiceAction::Status => &self.status,
        }
    }
}

/// Controls a service by running its manager's commands.
pub struct CommandServiceController {
    service: ServiceName,
    commands: ServiceCommands,
    runner: Arc<dyn ProcessRunner>,
}

impl CommandServiceController {
    pub fn new(
        service: ServiceName,
        commands: ServiceCommands,
        runner: Arc<dyn ProcessRunner>,
    ) -> Self {
        Self {
            service,
            commands,
            runner,
        }
    }

    pub fn commands(&self) -> &ServiceCommands {
        &self.commands
    }
}

#[async_trait]
impl ServiceController for CommandServiceController {
    fn service(&self) -> &ServiceName {
        &self.service
    }

    async fn stop(&self) -> Result<(), ProcessError> {
        self.runner.run(&self.commands.stop).await.map(|_| ())
    }

    async fn start(&self) -> Result<(), ProcessError> {
        self.runner.run(&self.commands.start).await.map(|_| ())
    }

    async fn status(&self) -> Result<ServiceStatus, ProcessError> {
        let output = self.runner.output(&self.commands.status).await?;
        Ok(ServiceStatus::from_exit_code(output.exit_code))
    }
}
