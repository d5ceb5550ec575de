//! Client configuration.

use std::path::Path;

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use openreg_core::{CallOptions, SchemaSelector};

use crate::telemetry::LogConfig;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid YAML config: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Settings shared by [`Registrant`](crate::Registrant) and
/// [`Certifier`](crate::Certifier).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Account every state-changing call is sent from
    #[serde(default)]
    pub sender: Address,
    /// Gas budget per call
    #[serde(default = "default_gas")]
    pub gas: u64,
    /// Schema used by `create_thing` / `create_many`
    #[serde(default)]
    pub schema: SchemaSelector,
    #[serde(default)]
    pub log: LogConfig,
}

fn default_gas() -> u64 {
    CallOptions::DEFAULT_GAS
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            sender: Address::ZERO,
            gas: default_gas(),
            schema: SchemaSelector::default(),
            log: LogConfig::default(),
        }
    }
}

impl ClientConfig {
    /// Config for `sender` with every other setting at its default.
    pub fn for_sender(sender: Address) -> Self {
        Self {
            sender,
            ..Self::default()
        }
    }

    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(s)?)
    }

    /// Load from a `.json` file, or YAML for any other extension.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json_str(&content),
            _ => Self::from_yaml_str(&content),
        }
    }

    /// Options attached to every state-changing ledger call.
    pub fn call_options(&self) -> CallOptions {
        CallOptions::new(self.sender).with_gas(self.gas)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::telemetry::LogFormat;

    #[test]
    fn yaml_with_defaults() {
        let config = ClientConfig::from_yaml_str(
            "sender: \"0x00000000000000000000000000000000000000aa\"\nschema: \"urn:openregistry:thing\"\n",
        )
        .unwrap();
        assert_eq!(config.gas, 2_000_000);
        assert_eq!(config.schema.as_str(), "urn:openregistry:thing");
        assert_eq!(config.log.level, "info");
        let options = config.call_options();
        assert_eq!(options.gas, 2_000_000);
        assert_eq!(options.from, config.sender);
    }

    #[test]
    fn json_overrides() {
        let config = ClientConfig::from_json_str(
            r#"{ "gas": 500000, "log": { "level": "debug", "format": "json" } }"#,
        )
        .unwrap();
        assert_eq!(config.gas, 500_000);
        assert_eq!(config.sender, Address::ZERO);
        assert_eq!(config.schema, SchemaSelector::default());
        assert_eq!(config.log.format, LogFormat::Json);
    }

    #[test]
    fn rejects_bad_sender() {
        assert!(matches!(
            ClientConfig::from_json_str(r#"{ "sender": "nope" }"#),
            Err(ConfigError::Json(_))
        ));
    }
}
