//! Loading and validating `launcher.toml`.
//!
//! [`ConfigLoader::load`] reads the file from the NovaDE config directory and
//! falls back to defaults when it does not exist. An explicitly given path
//! ([`ConfigLoader::load_from_path`]) must exist. Every successfully parsed
//! configuration goes through the same validation:
//!
//! - log level and format are normalized to lowercase and checked,
//! - a relative log file path is resolved against the NovaDE state directory,
//! - both broker timeouts must be non-zero,
//! - the D-Bus service name and object path must be valid.

use super::types::LauncherConfig;
use crate::error::ConfigError;
use crate::utils::paths::{default_config_path, get_app_state_dir};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use zbus::names::WellKnownName;
use zbus::zvariant::ObjectPath;

pub struct ConfigLoader;

impl ConfigLoader {
    /// Loads `launcher.toml` from the NovaDE config directory, or defaults if absent.
    pub fn load() -> Result<LauncherConfig, ConfigError> {
        let path = default_config_path()?;
        match fs::read_to_string(&path) {
            Ok(content) => {
                tracing::debug!(path = %path.display(), "Loading launcher configuration");
                Self::from_toml_str(&content)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                let mut config = LauncherConfig::default();
                Self::validate_config(&mut config, get_app_state_dir)?;
                Ok(config)
            }
            Err(e) => Err(ConfigError::ReadError { path, source: e }),
        }
    }

    /// Loads the configuration from an explicit file.
    pub fn load_from_path(path: &Path) -> Result<LauncherConfig, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses and validates TOML text. Blank text yields the defaults.
    pub fn from_toml_str(content: &str) -> Result<LauncherConfig, ConfigError> {
        let mut config: LauncherConfig = if content.trim().is_empty() {
            LauncherConfig::default()
        } else {
            toml::from_str(content)?
        };
        Self::validate_config(&mut config, get_app_state_dir)?;
        Ok(config)
    }

    /// `state_dir` is only consulted when a relative log file path needs resolving.
    fn validate_config(
        config: &mut LauncherConfig,
        state_dir: impl FnOnce() -> Result<PathBuf, ConfigError>,
    ) -> Result<(), ConfigError> {
        let level = config.logging.level.to_lowercase();
        match level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => config.logging.level = level,
            _ => {
                return Err(ConfigError::ValidationError(format!(
                    "Invalid log level: '{}'. Must be one of trace, debug, info, warn, error.",
                    config.logging.level
                )))
            }
        }

        let format = config.logging.format.to_lowercase();
        match format.as_str() {
            "text" | "json" => config.logging.format = format,
            _ => {
                return Err(ConfigError::ValidationError(format!(
                    "Invalid log format: '{}'. Must be one of text, json.",
                    config.logging.format
                )))
            }
        }

        if let Some(file_path) = &config.logging.file_path {
            if file_path.as_os_str().is_empty() {
                return Err(ConfigError::ValidationError(
                    "logging.file_path must not be empty".to_string(),
                ));
            }
            if file_path.is_relative() {
                config.logging.file_path = Some(state_dir()?.join(file_path));
            }
        }

        if config.broker.spawn_timeout_ms == 0 {
            return Err(ConfigError::ValidationError(
                "broker.spawn_timeout_ms must be greater than zero".to_string(),
            ));
        }
        if config.broker.activation_timeout_ms == 0 {
            return Err(ConfigError::ValidationError(
                "broker.activation_timeout_ms must be greater than zero".to_string(),
            ));
        }

        WellKnownName::try_from(config.dbus.service_name.as_str()).map_err(|e| {
            ConfigError::ValidationError(format!(
                "Invalid D-Bus service name '{}': {}",
                config.dbus.service_name, e
            ))
        })?;
        ObjectPath::try_from(config.dbus.object_path.as_str()).map_err(|e| {
            ConfigError::ValidationError(format!(
                "Invalid D-Bus object path '{}': {}",
                config.dbus.object_path, e
            ))
        })?;

        Ok(())
    }
}
