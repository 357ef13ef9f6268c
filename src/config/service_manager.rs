// ABOUTME: Service manager selection: sysv `service` or systemd `systemctl`.
// ABOUTME: Knows the argument order each manager expects for an action.

use serde::de::{self, Deserialize, Deserializer};
use std::fmt;
use std::str::FromStr;

use crate::process::CommandLine;
use crate::service::ServiceAction;
use crate::types::ServiceName;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ServiceManager {
    /// `service <name> <action>`
    #[default]
    Sysv,
    /// `systemctl <action> <name>`
    Systemd,
}

impl ServiceManager {
    /// Unprivileged command line for `action` on `service`.
    pub fn command(&self, service: &ServiceName, action: ServiceAction) -> CommandLine {
        match self {
            ServiceManager::Sysv => CommandLine::new("service")
                .arg(service.as_str())
                .arg(action.as_str()),
            ServiceManager::Systemd => CommandLine::new("systemctl")
                .arg(action.as_str())
                .arg(service.as_str()),
        }
    }
}

impl FromStr for ServiceManager {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sysv" | "service" => Ok(ServiceManager::Sysv),
            "systemd" | "systemctl" => Ok(ServiceManager::Systemd),
            _ => Err(format!("unknown service manager: {}", s)),
        }
    }
}

impl fmt::Display for ServiceManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceManager::Sysv => write!(f, "sysv"),
            ServiceManager::Systemd => write!(f, "systemd"),
        }
    }
}

impl<'de> Deserialize<'de> for ServiceManager {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}
