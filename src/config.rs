use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const ENV_SAMPLE_DELAY_MS: &str = "TASKLIST_SAMPLE_DELAY_MS";
pub const ENV_LOG_DIR: &str = "TASKLIST_LOG_DIR";
pub const ENV_LOG: &str = "TASKLIST_LOG";
pub const ENV_RUST_LOG: &str = "RUST_LOG";

const DEFAULT_SAMPLE_DELAY_MS: u64 = 500;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct StoreConfig {
    #[serde(default = "default_sample_delay_ms")]
    pub sample_delay_ms: u64,
    /// Directory for rotated log files. Logs go to stderr when unset.
    #[serde(default)]
    pub log_dir: Option<PathBuf>,
    #[serde(default)]
    pub log_spec: Option<String>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            sample_delay_ms: default_sample_delay_ms(),
            log_dir: None,
            log_spec: None,
        }
    }
}

fn default_sample_delay_ms() -> u64 {
    DEFAULT_SAMPLE_DELAY_MS
}

impl StoreConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds a config from an arbitrary variable lookup. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let mut config = Self::default();
        if let Some(raw) = get(ENV_SAMPLE_DELAY_MS) {
            config.sample_delay_ms = raw.parse().map_err(|_| ConfigError::InvalidEnv {
                name: ENV_SAMPLE_DELAY_MS,
                value: raw.clone(),
            })?;
        }
        config.log_dir = get(ENV_LOG_DIR).map(PathBuf::from);
        config.log_spec = get(ENV_LOG).or_else(|| get(ENV_RUST_LOG));
        Ok(config)
    }

    pub fn sample_delay(&self) -> Duration {
        Duration::from_millis(self.sample_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn default_values() {
        let config = StoreConfig::default();
        assert_eq!(config.sample_delay_ms, 500);
        assert_eq!(config.sample_delay(), Duration::from_millis(500));
        assert!(config.log_dir.is_none());
        assert!(config.log_spec.is_none());
    }

    #[test]
    fn json_applies_defaults_for_missing_fields() {
        let config = StoreConfig::from_json_str(r#"{ "log_spec": "debug" }"#).unwrap();
        assert_eq!(config.sample_delay_ms, 500);
        assert_eq!(config.log_spec.as_deref(), Some("debug"));

        assert!(matches!(
            StoreConfig::from_json_str("{ not json"),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn env_overrides_and_blank_values() {
        let config = StoreConfig::from_lookup(lookup(&[
            (ENV_SAMPLE_DELAY_MS, " 20 "),
            (ENV_LOG_DIR, "/tmp/tasklist"),
            (ENV_LOG, "   "),
            (ENV_RUST_LOG, "info"),
        ]))
        .unwrap();
        assert_eq!(config.sample_delay_ms, 20);
        assert_eq!(config.log_dir, Some(PathBuf::from("/tmp/tasklist")));
        assert_eq!(config.log_spec.as_deref(), Some("info"));
    }

    #[test]
    fn tasklist_log_wins_over_rust_log() {
        let config =
            StoreConfig::from_lookup(lookup(&[(ENV_LOG, "trace"), (ENV_RUST_LOG, "info")]))
                .unwrap();
        assert_eq!(config.log_spec.as_deref(), Some("trace"));
    }

    #[test]
    fn invalid_delay_is_rejected() {
        let err = StoreConfig::from_lookup(lookup(&[(ENV_SAMPLE_DELAY_MS, "soon")])).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidEnv {
                name: ENV_SAMPLE_DELAY_MS,
                ..
            }
        ));
    }
}
