//! Configuration schema for Syncache
//!
//! Configuration is stored at `~/.config/syncache/config.toml`

use crate::mutation::DEFAULT_TEMP_ID_PREFIX;
use serde::{Deserialize, Serialize};

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,

    /// Simulated remote settings
    pub remote: RemoteConfig,

    /// Optimistic mutation settings
    pub mutation: MutationConfig,
}

/// General application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Enable verbose logging
    pub verbose: bool,

    /// Log format: "text" or "json"
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            verbose: false,
            log_format: "text".to_string(),
        }
    }
}

/// Simulated remote latency and failure injection
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    /// Lower bound of per-request latency in milliseconds
    pub min_latency_ms: u64,

    /// Upper bound of per-request latency in milliseconds
    pub max_latency_ms: u64,

    /// Probability in [0, 1] that a request fails
    pub failure_rate: f64,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            min_latency_ms: 200,
            max_latency_ms: 800,
            failure_rate: 0.15,
        }
    }
}

/// Mutation coordinator settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MutationConfig {
    /// Prefix for ids of records created optimistically
    pub temp_id_prefix: String,
}

impl Default for MutationConfig {
    fn default() -> Self {
        Self {
            temp_id_prefix: DEFAULT_TEMP_ID_PREFIX.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes() {
        let config = Config::default();
        let toml = toml::to_string_pretty(&config).unwrap();
        assert!(toml.contains("[general]"));
        assert!(toml.contains("[remote]"));
        assert!(toml.contains("[mutation]"));
    }

    #[test]
    fn config_deserializes_empty() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.remote.failure_rate, 0.15);
        assert_eq!(config.mutation.temp_id_prefix, "temp-");
    }

    #[test]
    fn config_deserializes_partial() {
        let toml = r#"
            [remote]
            failure_rate = 0.5
        "#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.remote.failure_rate, 0.5);
        assert_eq!(config.remote.max_latency_ms, 800); // default preserved
    }
}
