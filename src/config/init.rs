// ABOUTME: Config scaffolding for new projects.
// ABOUTME: Creates rollout.yml template files.

use std::path::Path;

use crate::error::{Error, Result};
use crate::types::ServiceName;

use super::{CONFIG_FILENAME, Config};

pub fn init_config(
    dir: &Path,
    service: Option<&str>,
    artifact: Option<&str>,
    force: bool,
) -> Result<()> {
    let config_path = dir.join(CONFIG_FILENAME);

    if config_path.exists() && !force {
        return Err(Error::AlreadyExists(config_path));
    }

    let mut config = Config::template();

    if let Some(s) = service {
        config.service = ServiceName::new(s).map_err(|e| Error::InvalidConfig(e.to_string()))?;
    }

    if let Some(a) = artifact {
        if a.trim().is_empty() {
            return Err(Error::InvalidConfig("artifact path cannot be empty".to_string()));
        }
        config.artifact = a.into();
    }

    let yaml = generate_template_yaml(&config);
    std::fs::write(&config_path, yaml)?;

    Ok(())
}

fn generate_template_yaml(config: &Config) -> String {
    format!(
        r#"service: {}
artifact: {}
# Deployment directory. Override per run with --target-dir.
target_dir:
  env: ROLLOUT_TARGET_DIR
privilege: [sudo]
service_manager: {}
# What to do if the copy fails after the service was stopped:
# leave-stopped (default) or restart
on_copy_failure: {}
"#,
        config.service,
        config.artifact.display(),
        config.service_manager,
        config.on_copy_failure,
    )
}
