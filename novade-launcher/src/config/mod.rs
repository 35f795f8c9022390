//! Configuration management for the NovaDE launcher.
//!
//! - [`types`]: the schema of `launcher.toml` ([`LauncherConfig`] and its sections).
//! - [`defaults`]: default values used by `serde` for missing fields.
//! - [`loader`]: [`ConfigLoader`], which locates, parses and validates the file.
//!
//! ```toml
//! [logging]
//! level = "info"
//! format = "text"
//!
//! [broker]
//! spawn_timeout_ms = 5000
//! activation_timeout_ms = 3000
//!
//! [dbus]
//! bus = "session"
//! service_name = "org.novade.Launcher"
//! object_path = "/org/novade/Launcher"
//! ```

pub mod defaults;
pub mod loader;
pub mod types;

pub use loader::ConfigLoader;
pub use types::{BrokerConfig, BusKind, DbusConfig, LauncherConfig, LoggingConfig};
