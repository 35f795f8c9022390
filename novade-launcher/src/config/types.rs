//! Configuration data structures for the NovaDE launcher.
//!
//! All structs deny unknown fields and fill missing ones from
//! [`super::defaults`], so an empty `launcher.toml` is a valid configuration.

use super::defaults;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Logging settings, consumed by [`crate::logging::init_logging`].
///
/// # Examples
///
/// ```
/// use novade_launcher::config::LoggingConfig;
///
/// let config: LoggingConfig = toml::from_str(r#"level = "debug""#).unwrap();
/// assert_eq!(config.level, "debug");
/// assert_eq!(config.format, "text");
/// assert_eq!(config.file_path, None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// One of "trace", "debug", "info", "warn", "error" (case-insensitive).
    #[serde(default = "defaults::default_log_level")]
    pub level: String,
    /// Optional log file. Relative paths are resolved against the NovaDE state directory.
    #[serde(default = "defaults::default_log_file_path")]
    pub file_path: Option<PathBuf>,
    /// "text" or "json".
    #[serde(default = "defaults::default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::default_log_level(),
            file_path: defaults::default_log_file_path(),
            format: defaults::default_log_format(),
        }
    }
}

/// Bounds for the broker's collaborator calls.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BrokerConfig {
    #[serde(default = "defaults::default_spawn_timeout_ms")]
    pub spawn_timeout_ms: u64,
    #[serde(default = "defaults::default_activation_timeout_ms")]
    pub activation_timeout_ms: u64,
}

impl BrokerConfig {
    pub fn spawn_timeout(&self) -> Duration {
        Duration::from_millis(self.spawn_timeout_ms)
    }

    pub fn activation_timeout(&self) -> Duration {
        Duration::from_millis(self.activation_timeout_ms)
    }
}

impl Default for BrokerConfig {
    fn default() -> Self {
        Self {
            spawn_timeout_ms: defaults::default_spawn_timeout_ms(),
            activation_timeout_ms: defaults::default_activation_timeout_ms(),
        }
    }
}

/// Which message bus the launcher publishes itself on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BusKind {
    Session,
    System,
}

/// Where the IPC listener is published.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DbusConfig {
    #[serde(default = "defaults::default_bus")]
    pub bus: BusKind,
    #[serde(default = "defaults::default_service_name")]
    pub service_name: String,
    #[serde(default = "defaults::default_object_path")]
    pub object_path: String,
}

impl Default for DbusConfig {
    fn default() -> Self {
        Self {
            bus: defaults::default_bus(),
            service_name: defaults::default_service_name(),
            object_path: defaults::default_object_path(),
        }
    }
}

/// Root of `launcher.toml`.
///
/// # Examples
///
/// ```
/// use novade_launcher::config::{BusKind, LauncherConfig};
///
/// let config: LauncherConfig = toml::from_str(r#"
/// [broker]
/// spawn_timeout_ms = 2000
///
/// [dbus]
/// bus = "system"
/// "#).unwrap();
/// assert_eq!(config.broker.spawn_timeout_ms, 2000);
/// assert_eq!(config.broker.activation_timeout_ms, 3000);
/// assert_eq!(config.dbus.bus, BusKind::System);
/// assert_eq!(config.dbus.service_name, "org.novade.Launcher");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LauncherConfig {
    #[serde(default = "defaults::default_logging_config")]
    pub logging: LoggingConfig,
    #[serde(default = "defaults::default_broker_config")]
    pub broker: BrokerConfig,
    #[serde(default = "defaults::default_dbus_config")]
    pub dbus: DbusConfig,
}

impl Default for LauncherConfig {
    fn default() -> Self {
        Self {
            logging: defaults::default_logging_config(),
            broker: defaults::default_broker_config(),
            dbus: defaults::default_dbus_config(),
        }
    }
}
