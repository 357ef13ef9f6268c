// ABOUTME: Test support utilities.
// ABOUTME: Provides a scripted process runner, fake controllers, and tracing setup.

// Each test binary only uses some of these helpers, so allow dead_code.
#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::Mutex;
use rollout::artifact::{ArtifactInstaller, CommandInstaller};
use rollout::config::Config;
use rollout::process::{CommandLine, CommandOutput, ProcessError, ProcessRunner};
use rollout::service::{CommandServiceController, ServiceController, ServiceStatus};
use rollout::types::ServiceName;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Once};

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for tests. Safe to call multiple times.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::EnvFilter;
        let filter = EnvFilter::from_default_env().add_directive("rollout=debug".parse().unwrap());
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init()
            .ok();
    });
}

/// Process runner that records every command and fails the ones it is told to.
#[derive(Default)]
pub struct ScriptedRunner {
    calls: Mutex<Vec<CommandLine>>,
    failures: Mutex<Vec<(String, i32)>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl ScriptedRunner {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Any command whose rendered text contains `needle` exits with `code`.
    pub fn fail_when(&self, needle: &str, code: i32) {
        self.failures.lock().push((needle.to_string(), code));
    }

    /// Rendered commands in call order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().iter().map(|c| c.to_string()).collect()
    }

    pub fn argv(&self) -> Vec<Vec<String>> {
        self.calls.lock().iter().map(|c| c.to_vec()).collect()
    }

    /// Highest number of commands that were running at the same time.
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ProcessRunner for ScriptedRunner {
    async fn output(&self, command: &CommandLine) -> Result<CommandOutput, ProcessError> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        self.calls.lock().push(command.clone());

        tokio::task::yield_now().await;

        let rendered = command.to_string();
        let failure = self
            .failures
            .lock()
            .iter()
            .find(|(needle, _)| rendered.contains(needle.as_str()))
            .map(|(needle, code)| (needle.clone(), *code));

        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        Ok(match failure {
            Some((needle, code)) => CommandOutput {
                exit_code: Some(code),
                stdout: String::new(),
                stderr: format!("{needle}: scripted failure\n"),
            },
            None => CommandOutput {
                exit_code: Some(0),
                stdout: String::new(),
                stderr: String::new(),
            },
        })
    }
}

/// Real controller and installer wired to a scripted runner.
pub struct Harness {
    pub runner: Arc<ScriptedRunner>,
    pub controller: CommandServiceController,
    pub installer: CommandInstaller,
}

impl Harness {
    pub fn new(config: &Config) -> Self {
        let runner = ScriptedRunner::new();
        let controller = CommandServiceController::new(
            config.service.clone(),
            config.service_commands(),
            runner.clone(),
        );
        let installer = CommandInstaller::new(config.copy_command_line(), runner.clone());
        Self {
            runner,
            controller,
            installer,
        }
    }
}

/// The `/opt/deploy` scenario: sudo, sysv, no artifact check.
pub fn scenario_config() -> Config {
    Config::from_yaml(
        r#"
service: forex
artifact: /build/app.jar
target_dir: /opt/deploy
verify_artifact: false
"#,
    )
    .unwrap()
}

/// In-memory controller and installer that write to a shared journal.
#[derive(Clone)]
pub struct FakeService {
    service: ServiceName,
    journal: Arc<Mutex<Vec<String>>>,
    fail_stop: bool,
    fail_start: bool,
    fail_install: bool,
}

impl FakeService {
    pub fn new(service: &str) -> Self {
        Self {
            service: ServiceName::new(service).unwrap(),
            journal: Arc::new(Mutex::new(Vec::new())),
            fail_stop: false,
            fail_start: false,
            fail_install: false,
        }
    }

    pub fn failing_stop(mut self) -> Self {
        self.fail_stop = true;
        self
    }

    pub fn failing_start(mut self) -> Self {
        self.fail_start = true;
        self
    }

    pub fn failing_install(mut self) -> Self {
        self.fail_install = true;
        self
    }

    pub fn journal(&self) -> Vec<String> {
        self.journal.lock().clone()
    }

    fn record(&self, entry: String, fail: bool) -> Result<(), ProcessError> {
        self.journal.lock().push(entry.clone());
        if fail {
            CommandOutput {
                exit_code: Some(1),
                stdout: String::new(),
                stderr: "fake failure".to_string(),
            }
            .into_result(&CommandLine::new(entry))
            .map(|_| ())
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl ServiceController for FakeService {
    fn service(&self) -> &ServiceName {
        &self.service
    }

    async fn stop(&self) -> Result<(), ProcessError> {
        self.record("stop".to_string(), self.fail_stop)
    }

    async fn start(&self) -> Result<(), ProcessError> {
        self.record("start".to_string(), self.fail_start)
    }

    async fn status(&self) -> Result<ServiceStatus, ProcessError> {
        Ok(ServiceStatus::Running)
    }
}

#[async_trait]
impl ArtifactInstaller for FakeService {
    async fn install(&self, artifact: &Path, target_dir: &Path) -> Result<(), ProcessError> {
        self.record(
            format!("install {} {}", artifact.display(), target_dir.display()),
            self.fail_install,
        )
    }
}
