// ABOUTME: Custom serde deserializers for config types.
// ABOUTME: Validates service names while the file is parsed.

use serde::Deserialize;

use crate::types::ServiceName;

pub fn deserialize_service_name<'de, D>(deserializer: D) -> Result<ServiceName, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    ServiceName::new(&s).map_err(serde::de::Error::custom)
}
