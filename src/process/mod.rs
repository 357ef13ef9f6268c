// ABOUTME: External process execution for service control and artifact copies.
// ABOUTME: Wraps exit codes in typed results so callers never inspect raw statuses.

mod command_line;
mod error;
mod runner;

pub use command_line::CommandLine;
pub use error::{ExitSnafu, ProcessError, ProcessErrorKind, SpawnSnafu, TerminatedSnafu};
pub use runner::{CommandOutput, DryRunRunner, ProcessRunner, SystemRunner};
