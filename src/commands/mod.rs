// ABOUTME: Command module aggregator for the rollout CLI.
// ABOUTME: Re-exports task, status, and plan command handlers.

mod plan;
mod status;
mod task;

pub use plan::plan;
pub use status::status;
pub use task::run_task;
