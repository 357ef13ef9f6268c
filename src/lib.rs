// ABOUTME: Library root for rollout - exposes public types for testing.
// ABOUTME: The main binary is in main.rs.

pub mod artifact;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod lock;
pub mod output;
pub mod process;
pub mod release;
pub mod service;
pub mod types;
