//! Subscriber setup for binaries embedding the client.
//!
//! The library crates only emit `tracing` events; nothing is printed until
//! the host installs a subscriber, either its own or the one built here from
//! the `log` section of [`ClientConfig`](crate::ClientConfig).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Output encoding of log lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogConfig {
    /// Level for every target without an override.
    #[serde(default = "LogConfig::default_level")]
    pub level: String,
    /// Per-crate levels, keyed by crate name (`openreg-schema: debug`).
    #[serde(default)]
    pub crates: BTreeMap<String, String>,
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: Self::default_level(),
            crates: BTreeMap::new(),
            format: LogFormat::Text,
        }
    }
}

impl LogConfig {
    fn default_level() -> String {
        "info".into()
    }

    /// `EnvFilter` directive string, e.g. `"warn,openreg_client=debug"`.
    pub fn directives(&self) -> String {
        std::iter::once(self.level.clone())
            .chain(
                self.crates
                    .iter()
                    .map(|(name, level)| format!("{}={level}", name.replace('-', "_"))),
            )
            .collect::<Vec<_>>()
            .join(",")
    }

    /// `RUST_LOG` wins when set and valid; otherwise the configured directives.
    fn filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(self.directives()))
            .unwrap_or_else(|_| EnvFilter::new(Self::default_level()))
    }
}

/// Install the global subscriber described by `config`.
///
/// Fails if the process already has one.
pub fn init_tracing(config: &LogConfig) -> Result<(), TryInitError> {
    let registry = tracing_subscriber::registry().with(config.filter());
    match config.format {
        LogFormat::Json => registry.with(fmt::layer().json()).try_init(),
        LogFormat::Text => registry.with(fmt::layer()).try_init(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directives_list_crate_overrides_by_name() {
        let mut config = LogConfig {
            level: "warn".into(),
            ..LogConfig::default()
        };
        config.crates.insert("openreg-schema".into(), "debug".into());
        config.crates.insert("openreg-client".into(), "trace".into());
        assert_eq!(
            config.directives(),
            "warn,openreg_client=trace,openreg_schema=debug"
        );
        assert_eq!(LogConfig::default().directives(), "info");
    }

    #[test]
    fn yaml_section_with_defaults() {
        let config: LogConfig = serde_yaml::from_str("format: json\n").unwrap();
        assert_eq!(config.format, LogFormat::Json);
        assert_eq!(config.level, "info");
        assert!(config.crates.is_empty());

        let config: LogConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, LogConfig::default());
    }
}
