// ABOUTME: Release state marker types for the type state pattern.
// ABOUTME: Zero-sized types enforce stop -> copy -> start ordering at compile time.

/// Nothing has run yet.
/// Available actions: `stop_service()`
#[derive(Debug, Clone, Copy, Default)]
pub struct Idle;

/// Service stop command succeeded.
/// Available actions: `copy_artifact()`, `restart_previous()`
#[derive(Debug, Clone, Copy, Default)]
pub struct Stopped;

/// Artifact copied into the target directory.
/// Available actions: `start_service()`
#[derive(Debug, Clone, Copy, Default)]
pub struct Copied;

/// Service start command succeeded. Says nothing about service health.
/// Available actions: `finish()`
#[derive(Debug, Clone, Copy, Default)]
pub struct Started;
