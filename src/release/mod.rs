// ABOUTME: Release orchestration using the type state pattern.
// ABOUTME: Exports the task graph, state markers, Release struct, and the orchestrator.

mod error;
mod orchestrator;
mod plan;
#[allow(clippy::module_inception)]
mod release;
mod state;
mod task;
mod transitions;

pub use error::{ReleaseError, ReleaseErrorKind};
pub use orchestrator::{Orchestrator, ReleaseReport};
pub use plan::ReleasePlan;
pub use release::Release;
pub use state::{Copied, Idle, Started, Stopped};
pub use task::{Step, Task};
pub use transitions::TransitionResult;
