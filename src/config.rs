use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::utils;

/// Current configuration version
pub const CURRENT_CONFIG_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Empty in the file means the profile's default location
    #[serde(default)]
    pub database_path: String,
    #[serde(default = "default_reminder_body")]
    pub default_reminder_body: String,
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
    #[serde(default)]
    pub login: LoginConfig,
    #[serde(default = "default_config_version")]
    pub config_version: Option<u32>,
}

/// The single account allowed through the login gate
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoginConfig {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: Self::default_database_path_for_profile(utils::Profile::Prod),
            default_reminder_body: default_reminder_body(),
            log_filter: default_log_filter(),
            login: LoginConfig::default(),
            config_version: Some(CURRENT_CONFIG_VERSION),
        }
    }
}

// Default value functions
fn default_reminder_body() -> String {
    "Don't forget your reminder!".to_string()
}

fn default_log_filter() -> String {
    "studydesk=warn".to_string()
}

fn default_config_version() -> Option<u32> {
    Some(CURRENT_CONFIG_VERSION)
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config directory: {0}")]
    ConfigDirError(String),
    #[error("Failed to read config file: {0}")]
    ReadError(String),
    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Failed to write config file: {0}")]
    WriteError(String),
}

impl Config {
    /// Load configuration from file, or create default if missing
    /// Uses the provided profile to determine config and database paths
    pub fn load_with_profile(profile: utils::Profile) -> Result<Self, ConfigError> {
        let config_path = Self::get_config_path(profile)?;
        Self::load_or_create(&config_path, profile)
    }

    /// Load `config_path`, writing a default config there first if it is missing
    pub fn load_or_create(
        config_path: &Path,
        profile: utils::Profile,
    ) -> Result<Self, ConfigError> {
        if config_path.exists() {
            return Self::load_from_path(config_path, profile);
        }
        let mut config = Config::default();
        config.database_path = Self::default_database_path_for_profile(profile);
        if let Err(e) = config.save_to_path(config_path) {
            tracing::error!(
                path = %config_path.display(),
                error = %e,
                "failed to save config file"
            );
            return Err(e);
        }
        Ok(config)
    }

    /// Load configuration from an explicit file. The database path it names is
    /// kept; without one the profile's default location is used.
    pub fn load_from_path(path: &Path, profile: utils::Profile) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)
            .map_err(|e| ConfigError::ReadError(format!("{}: {}", path.display(), e)))?;
        let mut config: Config = toml::from_str(&contents)?;
        if config.config_version.unwrap_or(0) > CURRENT_CONFIG_VERSION {
            tracing::warn!(
                found = ?config.config_version,
                supported = CURRENT_CONFIG_VERSION,
                "config file is newer than this build"
            );
        }
        if utils::is_blank(&config.database_path) {
            config.database_path = Self::default_database_path_for_profile(profile);
        }
        Ok(config)
    }

    /// Write configuration to `path`, creating parent directories as needed
    pub fn save_to_path(&mut self, path: &Path) -> Result<(), ConfigError> {
        // Ensure config version is set before saving
        self.config_version = Some(CURRENT_CONFIG_VERSION);

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::WriteError(e.to_string()))?;
        }

        let toml_string = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::WriteError(format!("Failed to serialize config: {}", e)))?;

        fs::write(path, toml_string).map_err(|e| ConfigError::WriteError(e.to_string()))?;

        Ok(())
    }

    /// Get the path to the config file
    pub fn get_config_path(profile: utils::Profile) -> Result<PathBuf, ConfigError> {
        let config_dir = utils::get_config_dir(profile).ok_or_else(|| {
            ConfigError::ConfigDirError("Could not determine config directory".to_string())
        })?;
        Ok(config_dir.join("config.toml"))
    }

    /// Get default database path for a specific profile
    fn default_database_path_for_profile(profile: utils::Profile) -> String {
        if let Some(data_dir) = utils::get_data_dir(profile) {
            data_dir.join("studydesk.db").to_string_lossy().to_string()
        } else {
            #[cfg(target_os = "macos")]
            {
                match profile {
                    utils::Profile::Dev => {
                        "~/Library/Application Support/studydesk-dev/studydesk.db".to_string()
                    }
                    utils::Profile::Prod => {
                        "~/Library/Application Support/studydesk/studydesk.db".to_string()
                    }
                }
            }
            #[cfg(not(target_os = "macos"))]
            {
                match profile {
                    utils::Profile::Dev => "~/.local/share/studydesk-dev/studydesk.db".to_string(),
                    utils::Profile::Prod => "~/.local/share/studydesk/studydesk.db".to_string(),
                }
            }
        }
    }

    /// Get the expanded database path (with ~ expansion)
    pub fn get_database_path(&self) -> PathBuf {
        utils::expand_path(&self.database_path)
    }
}
