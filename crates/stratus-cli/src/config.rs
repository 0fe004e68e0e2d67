//! Configuration file management.

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Configuration file structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the weather provider API
    #[serde(default = "default_provider_url")]
    pub provider_url: String,

    /// Database path (platform data directory when unset)
    #[serde(default)]
    pub database: Option<PathBuf>,

    /// Minutes before a stored reading counts as stale
    #[serde(default = "default_staleness_minutes")]
    pub staleness_minutes: i64,
}

fn default_provider_url() -> String {
    "http://localhost:9090".to_string()
}

fn default_staleness_minutes() -> i64 {
    stratus_core::DEFAULT_STALENESS_MINUTES
}

impl Default for Config {
    fn default() -> Self {
        Self {
            provider_url: default_provider_url(),
            database: None,
            staleness_minutes: default_staleness_minutes(),
        }
    }
}

impl Config {
    /// Get the config file path
    pub fn path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("stratus")
            .join("config.toml")
    }

    /// Load config from file, or return default if not found
    pub fn load() -> Self {
        let path = Self::path();
        if path.exists() {
            match fs::read_to_string(&path) {
                Ok(content) => match toml::from_str(&content) {
                    Ok(config) => return config,
                    Err(e) => {
                        eprintln!("Warning: Failed to parse config: {}", e);
                    }
                },
                Err(e) => {
                    eprintln!("Warning: Failed to read config: {}", e);
                }
            }
        }
        Self::default()
    }

    /// Database path: explicit config value or the platform default
    pub fn database_path(&self) -> PathBuf {
        self.database
            .clone()
            .unwrap_or_else(stratus_store::default_db_path)
    }
}

/// Apply command-line overrides on top of the loaded config.
/// Explicit flags always win over file values.
pub fn apply_overrides(
    mut config: Config,
    database: Option<PathBuf>,
    provider_url: Option<String>,
) -> Config {
    if let Some(path) = database {
        config.database = Some(path);
    }
    if let Some(url) = provider_url {
        config.provider_url = url;
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.provider_url, "http://localhost:9090");
        assert!(config.database.is_none());
        assert_eq!(
            config.staleness_minutes,
            stratus_core::DEFAULT_STALENESS_MINUTES
        );
    }

    #[test]
    fn test_config_path_ends_with_toml() {
        let path = Config::path();
        assert!(path.to_string_lossy().ends_with("config.toml"));
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: Config = toml::from_str("provider_url = \"http://meteo.example\"").unwrap();
        assert_eq!(config.provider_url, "http://meteo.example");
        assert!(config.database.is_none());
        assert_eq!(
            config.staleness_minutes,
            stratus_core::DEFAULT_STALENESS_MINUTES
        );
    }

    #[test]
    fn test_config_round_trips_through_toml() {
        let config = Config {
            provider_url: "http://meteo.example:8081".to_string(),
            database: Some(PathBuf::from("/var/lib/stratus/data.db")),
            staleness_minutes: 15,
        };

        let toml_str = toml::to_string(&config).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();

        assert_eq!(parsed.provider_url, "http://meteo.example:8081");
        assert_eq!(
            parsed.database,
            Some(PathBuf::from("/var/lib/stratus/data.db"))
        );
        assert_eq!(parsed.staleness_minutes, 15);
    }

    #[test]
    fn test_apply_overrides_prefers_flags() {
        let config = Config {
            provider_url: "http://from-config".to_string(),
            database: Some(PathBuf::from("/config/db")),
            staleness_minutes: 40,
        };

        let merged = apply_overrides(
            config,
            Some(PathBuf::from("/flag/db")),
            Some("http://from-flag".to_string()),
        );

        assert_eq!(merged.provider_url, "http://from-flag");
        assert_eq!(merged.database, Some(PathBuf::from("/flag/db")));
    }

    #[test]
    fn test_apply_overrides_keeps_config_when_no_flags() {
        let config = Config {
            provider_url: "http://from-config".to_string(),
            database: Some(PathBuf::from("/config/db")),
            staleness_minutes: 40,
        };

        let merged = apply_overrides(config, None, None);

        assert_eq!(merged.provider_url, "http://from-config");
        assert_eq!(merged.database, Some(PathBuf::from("/config/db")));
    }

    #[test]
    fn test_database_path_falls_back_to_platform_default() {
        let config = Config::default();
        assert_eq!(config.database_path(), stratus_store::default_db_path());
    }

    #[test]
    fn test_database_path_uses_explicit_value() {
        let config = Config {
            database: Some(PathBuf::from("/tmp/custom.db")),
            ..Default::default()
        };
        assert_eq!(config.database_path(), PathBuf::from("/tmp/custom.db"));
    }
}
