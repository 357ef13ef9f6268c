// ABOUTME: Validated domain types shared across the crate.
// ABOUTME: Keeps untrusted names from reaching privileged command lines.

mod service_name;

pub use service_name::{ServiceName, ServiceNameError};
