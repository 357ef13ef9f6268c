// ABOUTME: Release lock to prevent concurrent releases of the same service.
// ABOUTME: Uses atomic file creation with lock info stored in the configured state directory.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use crate::types::ServiceName;

static TOMBSTONES: AtomicU64 = AtomicU64::new(0);

/// Errors acquiring or releasing a release lock.
#[derive(Debug, thiserror::Error)]
pub enum LockError {
    #[error(
        "release of {service} already in progress on {holder} (pid {pid}) since {started_at}; \
         use --force to break the lock"
    )]
    Held {
        service: String,
        holder: String,
        pid: u32,
        started_at: DateTime<Utc>,
    },

    #[error("lock at {} was taken by another process while breaking it", .0.display())]
    Contended(PathBuf),

    #[error("lock file error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode lock info: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Information about who holds a release lock.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LockInfo {
    /// Hostname of the machine that holds the lock.
    pub holder: String,
    /// Process ID of the lock holder.
    pub pid: u32,
    /// When the lock was acquired.
    pub started_at: DateTime<Utc>,
    /// Service being released.
    pub service: String,
}

impl LockInfo {
    /// Create new lock info for the current process.
    pub fn new(service: &ServiceName) -> Self {
        Self {
            holder: gethostname::gethostname().to_string_lossy().into_owned(),
            pid: std::process::id(),
            started_at: Utc::now(),
            service: service.to_string(),
        }
    }

    /// Whether the lock is at least `max_age` old.
    pub fn is_stale(&self, max_age: Duration) -> bool {
        (Utc::now() - self.started_at)
            .to_std()
            .map(|age| age >= max_age)
            .unwrap_or(false)
    }
}

/// A held release lock. Released explicitly or, failing that, on drop.
#[derive(Debug)]
pub struct ReleaseLock {
    path: PathBuf,
    released: bool,
}

impl ReleaseLock {
    /// Lock file for `service` inside `dir`.
    pub fn path_for(dir: &Path, service: &ServiceName) -> PathBuf {
        dir.join(format!("{}.lock", service))
    }

    /// Acquire the lock for `service`.
    ///
    /// Creation is atomic (`create_new`), so two racing processes cannot both
    /// succeed. An existing lock is broken when `force` is set, when it is
    /// older than `stale_after`, or when it cannot be parsed.
    pub fn acquire(
        dir: &Path,
        service: &ServiceName,
        force: bool,
        stale_after: Duration,
    ) -> Result<Self, LockError> {
        fs::create_dir_all(dir).map_err(|source| LockError::Io {
            path: dir.to_path_buf(),
            source,
        })?;

        let path = Self::path_for(dir, service);
        let info = LockInfo::new(service);

        if Self::try_create(&path, &info)? {
            return Ok(Self {
                path,
                released: false,
            });
        }

        let judged = Self::check_existing(&path, force, stale_after)?;

        if !Self::break_lock(&path, judged.as_deref())? || !Self::try_create(&path, &info)? {
            return Err(LockError::Contended(path));
        }

        Ok(Self {
            path,
            released: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Remove the lock file.
    pub fn release(mut self) -> Result<(), LockError> {
        self.released = true;
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(source) if source.kind() == ErrorKind::NotFound => Ok(()),
            Err(source) => Err(LockError::Io {
                path: self.path.clone(),
                source,
            }),
        }
    }

    /// Create the lock file if absent. `Ok(false)` means someone holds it.
    fn try_create(path: &Path, info: &LockInfo) -> Result<bool, LockError> {
        let json = serde_json::to_string(info)?;
        let io_err = |source| LockError::Io {
            path: path.to_path_buf(),
            source,
        };

        match OpenOptions::new().write(true).create_new(true).open(path) {
            Ok(mut file) => {
                file.write_all(json.as_bytes()).map_err(io_err)?;
                Ok(true)
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => Ok(false),
            Err(e) => Err(io_err(e)),
        }
    }

    /// Move the lock at `path` aside, but only if it is still the one that
    /// was judged breakable. `judged` is `None` when it could not be read.
    ///
    /// `Ok(false)` means another process replaced the lock in the meantime;
    /// its lock is put back.
    fn break_lock(path: &Path, judged: Option<&str>) -> Result<bool, LockError> {
        let tombstone = path.with_extension(format!(
            "lock.{}.{}.broken",
            std::process::id(),
            TOMBSTONES.fetch_add(1, Ordering::Relaxed)
        ));

        tracing::debug!("Breaking lock at {}", path.display());
        match fs::rename(path, &tombstone) {
            Ok(()) => {}
            // Already gone; whoever creates it first wins.
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(true),
            Err(source) => {
                return Err(LockError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        }

        let taken = fs::read_to_string(&tombstone).ok();
        if judged.is_some() && taken.as_deref() != judged {
            tracing::warn!("Lock at {} was replaced while breaking it", path.display());
            if let Err(e) = fs::hard_link(&tombstone, path) {
                tracing::warn!("Could not restore lock at {}: {}", path.display(), e);
            }
            let _ = fs::remove_file(&tombstone);
            return Ok(false);
        }

        fs::remove_file(&tombstone).map_err(|source| LockError::Io {
            path: tombstone,
            source,
        })?;
        Ok(true)
    }

    /// Decide whether an existing lock may be broken; errors if it is held.
    /// Returns the content the decision was based on.
    fn check_existing(
        path: &Path,
        force: bool,
        stale_after: Duration,
    ) -> Result<Option<String>, LockError> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(_) => {
                tracing::warn!("Lock info unreadable, breaking lock");
                return Ok(None);
            }
        };

        let breakable = Ok(Some(content.clone()));
        match serde_json::from_str::<LockInfo>(&content) {
            Ok(existing) if force => {
                tracing::warn!(
                    "Breaking lock held by {} (pid {}) since {}",
                    existing.holder,
                    existing.pid,
                    existing.started_at
                );
                breakable
            }
            Ok(existing) if existing.is_stale(stale_after) => {
                tracing::warn!(
                    "Auto-breaking stale lock held by {} (pid {}) since {}",
                    existing.holder,
                    existing.pid,
                    existing.started_at
                );
                breakable
            }
            Ok(existing) => Err(LockError::Held {
                service: existing.service,
                holder: existing.holder,
                pid: existing.pid,
                started_at: existing.started_at,
            }),
            Err(_) => {
                tracing::warn!("Lock info corrupted, breaking lock");
                breakable
            }
        }
    }
}

impl Drop for ReleaseLock {
    fn drop(&mut self) {
        if !self.released {
            let _ = fs::remove_file(&self.path);
        }
    }
}
