//! Configuration management for srms.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::path::PathBuf;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::store::DEFAULT_STORAGE_KEY;

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default data directory name.
const DATA_DIR_NAME: &str = "srms";

/// Default database file name.
const DATABASE_FILE_NAME: &str = "records.db";

/// Prefix for environment overrides.
const ENV_PREFIX: &str = "SRMS_";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `SRMS_`, sections split by `__`,
///    e.g. `SRMS_STORAGE__KEY`)
/// 2. TOML config file at `~/.config/srms/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Storage configuration.
    pub storage: StorageConfig,
    /// Display configuration.
    pub display: DisplayConfig,
}

/// Storage-related configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path to the database file.
    /// Defaults to `~/.local/share/srms/records.db`
    pub database_path: Option<PathBuf>,
    /// Name of the slot holding the record list.
    pub key: String,
}

/// How record lists are displayed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Shown in the CGPA column when a record has none.
    pub cgpa_placeholder: String,
    /// Shown instead of the table when there is nothing to list.
    pub empty_message: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: None, // Will be resolved to default at runtime
            key: DEFAULT_STORAGE_KEY.to_string(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            cgpa_placeholder: "-".to_string(),
            empty_message: "No student records found.".to_string(),
        }
    }
}

impl Config {
    /// Load configuration with an optional custom config path.
    ///
    /// A missing config file is not an error; defaults apply.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading, parsing or validation fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = Self::resolve_path(config_path);

        let config: Config = Self::figment(config_file).extract()?;
        config.validate()?;
        Ok(config)
    }

    fn figment(config_file: PathBuf) -> Figment {
        Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(config_file))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// The config file in effect: `config_path` if given, else the default.
    #[must_use]
    pub fn resolve_path(config_path: Option<PathBuf>) -> PathBuf {
        config_path.unwrap_or_else(Self::default_config_path)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(DATA_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from(".local/share"))
            .join(DATA_DIR_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        if self.storage.key.trim().is_empty() {
            return Err(Error::ConfigValidation {
                message: "storage.key must not be empty".to_string(),
            });
        }

        if self.display.cgpa_placeholder.is_empty() {
            return Err(Error::ConfigValidation {
                message: "display.cgpa_placeholder must not be empty".to_string(),
            });
        }

        if matches!(&self.storage.database_path, Some(p) if p.as_os_str().is_empty()) {
            return Err(Error::ConfigValidation {
                message: "storage.database_path must not be empty when set".to_string(),
            });
        }

        Ok(())
    }

    /// Get the database path, resolving defaults if not set.
    #[must_use]
    pub fn database_path(&self) -> PathBuf {
        self.storage
            .database_path
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(DATABASE_FILE_NAME))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert!(config.storage.database_path.is_none());
        assert_eq!(config.storage.key, "srms_data");
        assert_eq!(config.display.cgpa_placeholder, "-");
        assert_eq!(config.display.empty_message, "No student records found.");
    }

    #[test]
    fn test_validate_valid_config() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_validate_empty_key() {
        let mut config = Config::default();
        config.storage.key = "  ".to_string();

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("storage.key"));
    }

    #[test]
    fn test_validate_empty_placeholder() {
        let mut config = Config::default();
        config.display.cgpa_placeholder = String::new();

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("cgpa_placeholder"));
    }

    #[test]
    fn test_validate_empty_database_path() {
        let mut config = Config::default();
        config.storage.database_path = Some(PathBuf::new());

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("database_path"));
    }

    #[test]
    fn test_database_path_default() {
        let config = Config::default();
        let path = config.database_path();

        assert!(path.to_string_lossy().contains("records.db"));
        assert!(path.to_string_lossy().contains("srms"));
    }

    #[test]
    fn test_database_path_custom() {
        let mut config = Config::default();
        config.storage.database_path = Some(PathBuf::from("/custom/path/db.sqlite"));

        assert_eq!(
            config.database_path(),
            PathBuf::from("/custom/path/db.sqlite")
        );
    }

    #[test]
    fn test_default_config_path() {
        let path = Config::default_config_path();
        assert!(path.to_string_lossy().contains("srms"));
        assert!(path.to_string_lossy().contains("config.toml"));
    }

    #[test]
    fn test_resolve_path() {
        assert_eq!(
            Config::resolve_path(Some(PathBuf::from("/custom/srms.toml"))),
            PathBuf::from("/custom/srms.toml")
        );
        assert_eq!(Config::resolve_path(None), Config::default_config_path());
    }

    #[test]
    fn test_broken_file_does_not_affect_other_file() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("broken.toml", "[storage]\nkey = \"\"\n")?;
            jail.create_file("good.toml", "[storage]\nkey = \"class_5a\"\n")?;

            assert!(Config::load_from(Some(PathBuf::from("broken.toml"))).is_err());
            let config = Config::load_from(Some(PathBuf::from("good.toml")))
                .map_err(|e| e.to_string())?;
            assert_eq!(config.storage.key, "class_5a");
            Ok(())
        });
    }

    #[test]
    fn test_load_nonexistent_config() {
        figment::Jail::expect_with(|_jail| {
            let config = Config::load_from(Some(PathBuf::from("/nonexistent/config.toml")))
                .map_err(|e| e.to_string())?;
            assert_eq!(config, Config::default());
            Ok(())
        });
    }

    #[test]
    fn test_load_from_toml_file() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "srms.toml",
                r#"
                [storage]
                database_path = "/tmp/school.db"
                key = "class_5a"

                [display]
                cgpa_placeholder = "n/a"
                "#,
            )?;

            let config = Config::load_from(Some(PathBuf::from("srms.toml")))
                .map_err(|e| e.to_string())?;
            assert_eq!(config.database_path(), PathBuf::from("/tmp/school.db"));
            assert_eq!(config.storage.key, "class_5a");
            assert_eq!(config.display.cgpa_placeholder, "n/a");
            assert_eq!(config.display.empty_message, "No student records found.");
            Ok(())
        });
    }

    #[test]
    fn test_env_overrides_file() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("srms.toml", "[storage]\nkey = \"from_file\"\n")?;
            jail.set_env("SRMS_STORAGE__KEY", "from_env");

            let config = Config::load_from(Some(PathBuf::from("srms.toml")))
                .map_err(|e| e.to_string())?;
            assert_eq!(config.storage.key, "from_env");
            Ok(())
        });
    }

    #[test]
    fn test_invalid_file_value_is_rejected() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("srms.toml", "[storage]\nkey = \"\"\n")?;

            let result = Config::load_from(Some(PathBuf::from("srms.toml")));
            assert!(matches!(result, Err(Error::ConfigValidation { .. })));
            Ok(())
        });
    }

    #[test]
    fn test_config_serialize() {
        let json = serde_json::to_string(&Config::default()).unwrap();
        assert!(json.contains("cgpa_placeholder"));
        assert!(json.contains("srms_data"));
    }

    #[test]
    fn test_display_config_deserialize_partial() {
        let json = r#"{"empty_message": "Nothing here"}"#;
        let display: DisplayConfig = serde_json::from_str(json).unwrap();
        assert_eq!(display.empty_message, "Nothing here");
        assert_eq!(display.cgpa_placeholder, "-");
    }
}
