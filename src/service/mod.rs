// ABOUTME: Control of the OS service that runs the deployed artifact.
// ABOUTME: The ServiceController trait lets the release pipeline run against fakes in tests.

mod command;

pub use command::{CommandServiceController, ServiceCommands};

use async_trait::async_trait;
use std::fmt;

use crate::process::ProcessError;
use crate::types::ServiceName;

/// Actions the release pipeline asks of the service manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceAction {
    Stop,
    Start,
    Status,
}

impl ServiceAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceAction::Stop => "stop",
            ServiceAction::Start => "start",
            ServiceAction::Status => "status",
        }
    }
}

impl fmt::Display for ServiceAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Service status as reported by the status command's exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceStatus {
    Running,
    Stopped,
    /// Exit code outside the LSB convention, or `None` if killed by a signal.
    Unknown(Option<i32>),
}

impl ServiceStatus {
    /// Interpret an exit code following the LSB init script convention:
    /// 0 running, 1-3 not running, anything else unknown.
    pub fn from_exit_code(code: Option<i32>) -> Self {
        match code {
            Some(0) => ServiceStatus::Running,
            Some(1..=3) => ServiceStatus::Stopped,
            other => ServiceStatus::Unknown(other),
        }
    }
}

impl fmt::Display for ServiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceStatus::Running => write!(f, "running"),
            ServiceStatus::Stopped => write!(f, "stopped"),
            ServiceStatus::Unknown(Some(code)) => write!(f, "unknown (exit {})", code),
            ServiceStatus::Unknown(None) => write!(f, "unknown (terminated)"),
        }
    }
}

/// Starts and stops the service behind a release.
///
/// Success means the underlying control command exited zero; nothing here
/// waits for the service to become healthy.
#[async_trait]
pub trait ServiceController: Send + Sync {
    /// Name of the controlled service.
    fn service(&self) -> &ServiceName;

    async fn stop(&self) -> Result<(), ProcessError>;

    async fn start(&self) -> Result<(), ProcessError>;

    /// Query the service manager once. Never called by the release pipeline.
    async fn status(&self) -> Result<ServiceStatus, ProcessError>;
}
