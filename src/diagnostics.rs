// ABOUTME: Diagnostics accumulator for non-fatal warnings during a release.
// ABOUTME: Collects warnings that shouldn't change the outcome but must reach the operator.

/// Collects non-fatal warnings during release operations.
#[derive(Default)]
pub struct Diagnostics {
    warnings: Vec<Warning>,
}

impl Diagnostics {
    /// Record a warning, auto-logging it via tracing.
    pub fn warn(&mut self, warning: Warning) {
        tracing::warn!("{}", warning.message);
        self.warnings.push(warning);
    }

    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    pub fn has(&self, kind: WarningKind) -> bool {
        self.warnings.iter().any(|w| w.kind == kind)
    }
}

/// A non-fatal warning collected during a release.
#[derive(Debug, Clone)]
pub struct Warning {
    pub kind: WarningKind,
    pub message: String,
}

impl Warning {
    pub fn lock_release(message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::LockRelease,
            message: message.into(),
        }
    }

    pub fn service_left_stopped(message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::ServiceLeftStopped,
            message: message.into(),
        }
    }

    pub fn restart_failed(message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::RestartFailed,
            message: message.into(),
        }
    }
}

/// Categories of warnings that can occur during a release.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningKind {
    /// Lock file could not be removed and may block the next release.
    LockRelease,
    /// Copy failed after stop; the service is down until someone starts it.
    ServiceLeftStopped,
    /// Copy failed and the compensating restart failed too.
    RestartFailed,
}
