// ABOUTME: What to do with a stopped service when the artifact copy fails.
// ABOUTME: Either leave it stopped for the operator or restart the previous artifact.

use serde::de::{self, Deserialize, Deserializer};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CopyFailurePolicy {
    /// Leave the service stopped; the operator intervenes.
    #[default]
    LeaveStopped,
    /// Start the service again on whatever artifact is still in place.
    Restart,
}

impl FromStr for CopyFailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "leave-stopped" => Ok(CopyFailurePolicy::LeaveStopped),
            "restart" => Ok(CopyFailurePolicy::Restart),
            _ => Err(format!("unknown copy failure policy: {}", s)),
        }
    }
}

impl fmt::Display for CopyFailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CopyFailurePolicy::LeaveStopped => write!(f, "leave-stopped"),
            CopyFailurePolicy::Restart => write!(f, "restart"),
        }
    }
}

impl<'de> Deserialize<'de> for CopyFailurePolicy {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}
