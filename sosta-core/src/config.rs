//! Configuration surface consumed by the driver registry.
//!
//! The core never loads files; hosts deserialize [`HubConfig`] from whatever
//! source they use (TOML, JSON, environment layering) and hand it to
//! [`DriverRegistry::new`](crate::registry::DriverRegistry::new).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Key inside a driver block naming the provider implementation to construct.
pub const PROVIDER_KEY: &str = "provider";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
/// Raw configuration block for one driver.
///
/// Besides the [`PROVIDER_KEY`] entry, the contents are opaque to the core and
/// are passed through to the provider factory untouched (credentials,
/// endpoints, whatever the adapter needs).
pub struct DriverConfig(pub BTreeMap<String, Value>);

impl DriverConfig {
    /// Whether the block carries no entries at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        let DriverConfig(values) = self;
        values.is_empty()
    }

    /// Raw value for `key`, if present.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        let DriverConfig(values) = self;
        values.get(key)
    }

    /// String value for `key`, trimmed; `None` when absent, non-string, or
    /// blank.
    #[must_use]
    pub fn str_value(&self, key: &str) -> Option<&str> {
        self.get(key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|value| !value.is_empty())
    }

    /// The provider implementation reference for this block, if defined.
    #[must_use]
    pub fn implementation(&self) -> Option<&str> {
        self.str_value(PROVIDER_KEY)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
/// Top-level hub configuration: a default driver name and one block per
/// configured driver.
pub struct HubConfig {
    /// Driver used when callers do not name one.
    #[serde(default)]
    pub default_driver: Option<String>,
    /// Driver blocks keyed by driver name.
    #[serde(default)]
    pub drivers: BTreeMap<String, DriverConfig>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn deserializes_from_nested_json() {
        let config: HubConfig = serde_json::from_value(json!({
            "default_driver": "easypark",
            "drivers": {
                "easypark": {
                    "provider": "easypark",
                    "api_url": "https://city.example/restresources",
                    "username": "hub",
                },
            },
        }))
        .expect("config deserializes");

        assert_eq!(config.default_driver.as_deref(), Some("easypark"));
        let block = config.drivers.get("easypark").expect("driver block");
        assert_eq!(block.implementation(), Some("easypark"));
        assert_eq!(
            block.str_value("api_url"),
            Some("https://city.example/restresources")
        );
    }

    #[test]
    fn blank_and_non_string_values_read_as_absent() {
        let block: DriverConfig = serde_json::from_value(json!({
            "provider": "   ",
            "timeout": 5,
        }))
        .expect("block deserializes");

        assert_eq!(block.implementation(), None);
        assert_eq!(block.str_value("timeout"), None);
        assert_eq!(block.get("timeout"), Some(&json!(5)));
        assert!(!block.is_empty());
    }
}
