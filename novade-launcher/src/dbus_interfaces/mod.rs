//! D-Bus interfaces served by the launcher daemon.

pub mod launcher_service;

pub use launcher_service::{LauncherService, LAUNCHER_INTERFACE_NAME};
