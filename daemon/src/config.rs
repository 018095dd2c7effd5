//! Daemon configuration with TOML file support.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use truthmarket_types::ProtocolParams;
use truthmarket_utils::LogFormat;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("config not serializable: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Configuration for a market daemon.
///
/// Loaded from a TOML file via [`DaemonConfig::from_toml_file`]; every field
/// has a default, so an empty file is valid.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DaemonConfig {
    /// Log format: "human" or "json".
    #[serde(default)]
    pub log_format: LogFormat,

    /// Log level filter, e.g. "info" or "info,truthmarket_verification=debug".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Seconds between lifecycle sweeps.
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_secs: u64,

    /// Identities allowed to override claim status.
    #[serde(default)]
    pub operators: Vec<String>,

    /// Market and reputation parameters.
    #[serde(default)]
    pub params: ProtocolParams,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_sweep_interval() -> u64 {
    60
}

impl DaemonConfig {
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            log_format: LogFormat::default(),
            log_level: default_log_level(),
            sweep_interval_secs: default_sweep_interval(),
            operators: Vec::new(),
            params: ProtocolParams::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use truthmarket_types::Satoshis;

    #[test]
    fn empty_toml_uses_defaults() {
        let config = DaemonConfig::from_toml_str("").unwrap();
        assert_eq!(config, DaemonConfig::default());
        assert_eq!(config.params.market.min_quorum, 3);
    }

    #[test]
    fn default_config_survives_toml() {
        let config = DaemonConfig::default();
        let parsed = DaemonConfig::from_toml_str(&config.to_toml_string().unwrap()).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn nested_params_override_defaults() {
        let config = DaemonConfig::from_toml_str(
            r#"
            log_format = "json"
            sweep_interval_secs = 5
            operators = ["ops-1"]

            [params.market]
            min_quorum = 5
            min_stake = 1000

            [params.reputation]
            decay_rate = 0.1
            "#,
        )
        .unwrap();
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.sweep_interval_secs, 5);
        assert_eq!(config.operators, vec!["ops-1".to_string()]);
        assert_eq!(config.params.market.min_quorum, 5);
        assert_eq!(config.params.market.min_stake, Satoshis::new(1000));
        assert_eq!(config.params.market.platform_fee_bps, 200);
        assert!((config.params.reputation.decay_rate - 0.1).abs() < 1e-12);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "log_level = \"debug\"").unwrap();
        let config = DaemonConfig::from_toml_file(file.path()).unwrap();
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn missing_file_is_read_error() {
        let err = DaemonConfig::from_toml_file("/nonexistent/truthmarket.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn unknown_format_is_parse_error() {
        let err = DaemonConfig::from_toml_str("log_format = \"xml\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
