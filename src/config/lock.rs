// ABOUTME: Release lock configuration.
// ABOUTME: Defines where lock files live and when an abandoned lock may be broken.

use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

const STATE_DIR: &str = ".local/state/rollout";

#[derive(Debug, Clone, Deserialize)]
pub struct LockConfig {
    #[serde(default)]
    pub dir: Option<PathBuf>,

    #[serde(default = "default_stale_after", with = "humantime_serde")]
    pub stale_after: Duration,
}

fn default_stale_after() -> Duration {
    Duration::from_secs(60 * 60)
}

impl Default for LockConfig {
    fn default() -> Self {
        LockConfig {
            dir: None,
            stale_after: default_stale_after(),
        }
    }
}

impl LockConfig {
    /// Configured directory, else `$HOME/.local/state/rollout`, else the temp dir.
    pub fn dir(&self) -> PathBuf {
        if let Some(dir) = &self.dir {
            return dir.clone();
        }
        match std::env::var_os("HOME") {
            Some(home) => PathBuf::from(home).join(STATE_DIR),
            None => std::env::temp_dir().join("rollout"),
        }
    }
}
