// ABOUTME: Generic release struct parameterized by state marker.
// ABOUTME: Holds the resolved plan while the pipeline moves through its states.

use std::path::Path;

use super::plan::ReleasePlan;
use super::state::Idle;
use crate::types::ServiceName;

/// A release in progress, parameterized by its current state.
///
/// Transitions consume the release, so a step can only run after the one
/// before it succeeded.
#[derive(Debug)]
pub struct Release<S> {
    pub(crate) plan: ReleasePlan,
    pub(crate) state: S,
}

impl Release<Idle> {
    pub fn new(plan: ReleasePlan) -> Self {
        Release { plan, state: Idle }
    }
}

impl<S> Release<S> {
    pub fn plan(&self) -> &ReleasePlan {
        &self.plan
    }

    pub fn service(&self) -> &ServiceName {
        self.plan.service()
    }

    pub fn artifact(&self) -> &Path {
        self.plan.artifact()
    }

    pub fn target_dir(&self) -> &Path {
        self.plan.target_dir()
    }

    pub fn state(&self) -> &S {
        &self.state
    }

    pub(crate) fn transition<T>(self, state: T) -> Release<T> {
        Release {
            plan: self.plan,
            state,
        }
    }
}
