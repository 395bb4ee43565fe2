//! Configuration file loading for the rules engine.
//!
//! Settings live in `chess-rules.toml`. Every field has a default, so a
//! missing file or an empty section is valid.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur when loading or parsing configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    /// Failed to parse the configuration file as valid TOML.
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// Settings for [`DefaultMoveCache`](crate::DefaultMoveCache).
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct MoveCacheConfig {
    /// Estimated size in megabytes above which the cache is flushed.
    /// Defaults to 1024.
    #[serde(default = "default_max_size_mb")]
    pub max_size_mb: u64,
}

fn default_max_size_mb() -> u64 {
    1024
}

impl Default for MoveCacheConfig {
    fn default() -> Self {
        MoveCacheConfig {
            max_size_mb: default_max_size_mb(),
        }
    }
}

/// Main rules engine configuration.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq, Default)]
pub struct RulesConfig {
    #[serde(default)]
    pub move_cache: MoveCacheConfig,
}

impl RulesConfig {
    /// Loads the configuration from [`Self::config_path()`], falling back to
    /// defaults when the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ReadError`] if the file exists but cannot be read,
    /// or [`ConfigError::ParseError`] if the file contains invalid TOML.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(Self::config_path())
    }

    /// Loads the configuration from `path`, falling back to defaults when the
    /// file does not exist.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Ok(toml::from_str(&content)?)
        } else {
            Ok(Self::default())
        }
    }

    /// Returns the path to the configuration file.
    ///
    /// Currently returns `chess-rules.toml` in the current working directory.
    pub fn config_path() -> PathBuf {
        PathBuf::from("chess-rules.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_toml_config() {
        let config: RulesConfig = toml::from_str(
            r#"
[move_cache]
max_size_mb = 64
"#,
        )
        .unwrap();
        assert_eq!(config.move_cache.max_size_mb, 64);
    }

    #[test]
    fn test_defaults_for_missing_fields() {
        let config: RulesConfig = toml::from_str("").unwrap();
        assert_eq!(config, RulesConfig::default());
        assert_eq!(config.move_cache.max_size_mb, 1024);

        let config: RulesConfig = toml::from_str("[move_cache]\n").unwrap();
        assert_eq!(config.move_cache.max_size_mb, 1024);
    }

    #[test]
    fn test_invalid_toml_returns_error() {
        let result: Result<RulesConfig, _> = toml::from_str("[move_cache\nmax_size_mb = 1");
        assert!(result.is_err());

        let result: Result<RulesConfig, _> = toml::from_str("[move_cache]\nmax_size_mb = \"big\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let path = std::env::temp_dir().join("chess-rules-config-does-not-exist.toml");
        let config = RulesConfig::load_from(&path).unwrap();
        assert_eq!(config, RulesConfig::default());
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!(
            "chess-rules-config-{}.toml",
            std::process::id()
        ));
        std::fs::write(&path, "[move_cache]\nmax_size_mb = 8\n").unwrap();
        let loaded = RulesConfig::load_from(&path);
        std::fs::remove_file(&path).unwrap();
        assert_eq!(loaded.unwrap().move_cache.max_size_mb, 8);
    }

    #[test]
    fn test_parse_error_display() {
        let path = write_temp("not = [valid");
        let err = RulesConfig::load_from(&path).unwrap_err();
        std::fs::remove_file(&path).unwrap();
        assert!(matches!(err, ConfigError::ParseError(_)));
        assert!(err.to_string().starts_with("Failed to parse config"));
    }

    fn write_temp(content: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "chess-rules-config-invalid-{}.toml",
            std::process::id()
        ));
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_serialize_roundtrip() {
        let config = RulesConfig {
            move_cache: MoveCacheConfig { max_size_mb: 32 },
        };
        let text = toml::to_string(&config).unwrap();
        assert_eq!(toml::from_str::<RulesConfig>(&text).unwrap(), config);
    }
}
