// ABOUTME: OS service name validation.
// ABOUTME: Restricts names to characters init systems accept as a unit or script name.

use std::fmt;
use thiserror::Error;

const MAX_LEN: usize = 128;

#[derive(Debug, Error)]
pub enum ServiceNameError {
    #[error("service name cannot be empty")]
    Empty,

    #[error("service name exceeds maximum length of {MAX_LEN} characters")]
    TooLong,

    #[error("service name cannot start with a hyphen")]
    StartsWithHyphen,

    #[error("service name cannot start with a dot")]
    StartsWithDot,

    #[error("invalid character in service name: '{0}'")]
    InvalidChar(char),
}

/// Name of the service as known to the service manager (`forex`, `app@blue`).
///
/// The name is passed as an argument to privileged commands, so anything
/// that could be read as an option or a path is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ServiceName(String);

impl ServiceName {
    pub fn new(value: &str) -> Result<Self, ServiceNameError> {
        if value.is_empty() {
            return Err(ServiceNameError::Empty);
        }

        if value.len() > MAX_LEN {
            return Err(ServiceNameError::TooLong);
        }

        if value.starts_with('-') {
            return Err(ServiceNameError::StartsWithHyphen);
        }

        if value.starts_with('.') {
            return Err(ServiceNameError::StartsWithDot);
        }

        for c in value.chars() {
            if !c.is_ascii_alphanumeric() && !matches!(c, '-' | '_' | '.' | '@') {
                return Err(ServiceNameError::InvalidChar(c));
            }
        }

        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ServiceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
