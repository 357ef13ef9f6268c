// ABOUTME: Configuration types and parsing for rollout.yml.
// ABOUTME: Handles YAML parsing, target directory resolution, and destination merging.

mod copy_failure;
mod deserialize;
mod env_value;
mod init;
mod lock;
mod service_manager;

pub use copy_failure::CopyFailurePolicy;
pub use env_value::EnvValue;
pub use init::init_config;
pub use lock::LockConfig;
pub use service_manager::ServiceManager;

use crate::error::{Error, Result};
use crate::process::CommandLine;
use crate::release::ReleasePlan;
use crate::service::ServiceCommands;
use crate::types::ServiceName;
use deserialize::deserialize_service_name;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

pub const CONFIG_FILENAME: &str = "rollout.yml";
pub const CONFIG_FILENAME_ALT: &str = "rollout.yaml";
pub const CONFIG_FILENAME_DIR: &str = ".rollout/config.yml";
const CONFIG_DIR: &str = ".rollout";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(deserialize_with = "deserialize_service_name")]
    pub service: ServiceName,

    /// Built artifact. Relative paths resolve against the project directory.
    pub artifact: PathBuf,

    #[serde(default)]
    pub target_dir: Option<EnvValue>,

    /// Prefix for every control command. Empty runs commands directly.
    #[serde(default = "default_privilege")]
    pub privilege: Vec<String>,

    #[serde(default = "default_copy_command")]
    pub copy_command: CommandLine,

    #[serde(default)]
    pub service_manager: ServiceManager,

    #[serde(default)]
    pub commands: CommandOverrides,

    #[serde(default = "default_verify_artifact")]
    pub verify_artifact: bool,

    #[serde(default)]
    pub on_copy_failure: CopyFailurePolicy,

    #[serde(default)]
    pub lock: LockConfig,

    #[serde(default)]
    pub destinations: HashMap<String, Destination>,

    /// Directory the config was discovered in.
    #[serde(skip)]
    pub project_dir: Option<PathBuf>,
}

/// Replacement command lines for individual service actions.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CommandOverrides {
    #[serde(default)]
    pub stop: Option<CommandLine>,
    #[serde(default)]
    pub start: Option<CommandLine>,
    #[serde(default)]
    pub status: Option<CommandLine>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct Destination {
    #[serde(default)]
    pub target_dir: Option<EnvValue>,

    #[serde(default)]
    pub artifact: Option<PathBuf>,
}

/// Directory relative config paths resolve against: the directory holding
/// the file, or its parent for `.rollout/config.yml`.
pub fn project_dir_for(config_path: &Path) -> PathBuf {
    let parent = config_path.parent().unwrap_or(Path::new(""));
    match (parent.file_name(), parent.parent()) {
        (Some(name), Some(project)) if name == CONFIG_DIR => project.to_path_buf(),
        _ => parent.to_path_buf(),
    }
}

/// Command lines are built from strings, so a path that is not valid UTF-8
/// would be mangled before it reaches the copy command.
fn utf8_path<'p>(path: &'p Path, what: &str) -> Result<&'p str> {
    path.to_str().ok_or_else(|| {
        Error::InvalidConfig(format!("{} is not valid UTF-8: {}", what, path.display()))
    })
}

fn default_privilege() -> Vec<String> {
    vec!["sudo".to_string()]
}

fn default_copy_command() -> CommandLine {
    CommandLine::new("cp")
}

fn default_verify_artifact() -> bool {
    true
}

impl Config {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(Error::from)
    }

    /// Load a config file; relative paths in it resolve against the
    /// project directory (see [`project_dir_for`]).
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let mut config = Self::from_yaml(&content)?;
        config.project_dir = Some(project_dir_for(path));
        Ok(config)
    }

    pub fn discover(dir: &Path) -> Result<Self> {
        let candidates = [
            dir.join(CONFIG_FILENAME),
            dir.join(CONFIG_FILENAME_ALT),
            dir.join(CONFIG_FILENAME_DIR),
        ];

        for path in &candidates {
            if path.exists() {
                return Self::load(path);
            }
        }

        Err(Error::ConfigNotFound(dir.to_path_buf()))
    }

    pub fn for_destination(&self, name: &str) -> Result<Config> {
        let dest = self
            .destinations
            .get(name)
            .ok_or_else(|| Error::UnknownDestination(name.to_string()))?;

        let mut merged = self.clone();

        if dest.target_dir.is_some() {
            merged.target_dir = dest.target_dir.clone();
        }

        if let Some(ref artifact) = dest.artifact {
            merged.artifact = artifact.clone();
        }

        Ok(merged)
    }

    /// Artifact path with the project directory applied.
    pub fn artifact_path(&self) -> PathBuf {
        match &self.project_dir {
            Some(dir) if self.artifact.is_relative() => dir.join(&self.artifact),
            _ => self.artifact.clone(),
        }
    }

    /// Resolve the deployment directory: the command-line value wins over
    /// the config file. Missing or blank is a configuration error.
    pub fn resolve_target_dir(&self, cli: Option<&Path>) -> Result<PathBuf> {
        let raw = match cli {
            Some(dir) => utf8_path(dir, "target directory")?.to_string(),
            None => self
                .target_dir
                .as_ref()
                .ok_or(Error::MissingTargetDir)?
                .resolve()?,
        };

        if raw.trim().is_empty() {
            return Err(Error::MissingTargetDir);
        }

        Ok(PathBuf::from(raw))
    }

    /// Everything the copy step needs, validated before any command runs.
    pub fn release_plan(&self, target_dir: Option<&Path>) -> Result<ReleasePlan> {
        let artifact = self.artifact_path();
        utf8_path(&artifact, "artifact path")?;
        Ok(ReleasePlan::new(
            self.service.clone(),
            artifact,
            self.resolve_target_dir(target_dir)?,
        ))
    }

    pub fn service_commands(&self) -> ServiceCommands {
        ServiceCommands::new(
            self.service_manager,
            &self.service,
            &self.privilege,
            &self.commands,
        )
    }

    /// Copy command with privilege applied, without artifact or target.
    pub fn copy_command_line(&self) -> CommandLine {
        self.copy_command.clone().with_prefix(&self.privilege)
    }

    pub fn template() -> Self {
        Config {
            service: ServiceName::new("my-service").unwrap(),
            artifact: PathBuf::from("build/libs/app.jar"),
            target_dir: Some(EnvValue::FromEnv {
                var: "ROLLOUT_TARGET_DIR".to_string(),
                default: None,
            }),
            privilege: default_privilege(),
            copy_command: default_copy_command(),
            service_manager: ServiceManager::default(),
            commands: CommandOverrides::default(),
            verify_artifact: default_verify_artifact(),
            on_copy_failure: CopyFailurePolicy::default(),
            lock: LockConfig::default(),
            destinations: HashMap::new(),
            project_dir: None,
        }
    }
}
