//! Default configuration values for the NovaDE launcher.
//!
//! These functions are used by `serde`'s `default` attribute in the
//! configuration structures.

use super::types::{BrokerConfig, BusKind, DbusConfig, LoggingConfig};
use std::path::PathBuf;

pub const DEFAULT_SERVICE_NAME: &str = "org.novade.Launcher";
pub const DEFAULT_OBJECT_PATH: &str = "/org/novade/Launcher";

pub(super) fn default_logging_config() -> LoggingConfig {
    LoggingConfig::default()
}

pub(super) fn default_log_level() -> String {
    "info".to_string()
}

pub(super) fn default_log_file_path() -> Option<PathBuf> {
    None
}

pub(super) fn default_log_format() -> String {
    "text".to_string()
}

pub(super) fn default_broker_config() -> BrokerConfig {
    BrokerConfig::default()
}

/// Upper bound for creating a process, in milliseconds.
pub(super) fn default_spawn_timeout_ms() -> u64 {
    5_000
}

/// Upper bound for an activation round trip, in milliseconds.
pub(super) fn default_activation_timeout_ms() -> u64 {
    3_000
}

pub(super) fn default_dbus_config() -> DbusConfig {
    DbusConfig::default()
}

pub(super) fn default_bus() -> BusKind {
    BusKind::Session
}

pub(super) fn default_service_name() -> String {
    DEFAULT_SERVICE_NAME.to_string()
}

pub(super) fn default_object_path() -> String {
    DEFAULT_OBJECT_PATH.to_string()
}
