//! Error handling for the NovaDE launcher.
//!
//! Errors are split by concern, following the `thiserror` conventions used
//! across NovaDE:
//!
//! - [`LaunchError`]: why a single launch request produced `Failed`. These are
//!   always recoverable; the broker keeps serving afterwards.
//! - [`ActivationError`]: reported by an [`Activator`](crate::process::Activator)
//!   when a running instance could not be brought to the foreground.
//! - [`ConfigError`] and [`LoggingError`]: start-up failures of the daemon.
//! - [`LauncherError`]: the top-level error returned by daemon setup code.

use crate::dbus_integration::DbusManagerError;
use std::io;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Reason carried by [`LaunchOutcome::Failed`](crate::types::LaunchOutcome::Failed).
///
/// None of the variants leave a partial record behind in the registry.
#[derive(Debug, Error)]
pub enum LaunchError {
    /// The request did not name a usable executable (empty, blank or malformed).
    #[error("Invalid launch request: {0}")]
    InvalidRequest(String),

    /// The operating system refused to create the process.
    #[error("Failed to spawn '{identity}': {source}")]
    Spawn {
        identity: String,
        #[source]
        source: io::Error,
    },

    /// The process is alive but could not be brought to the foreground.
    #[error("Failed to activate process {pid}: {source}")]
    Activation {
        pid: u32,
        #[source]
        source: ActivationError,
    },

    /// A collaborator call did not finish within its bound.
    #[error("{operation} timed out after {after:?}")]
    Timeout {
        operation: &'static str,
        after: Duration,
    },
}

impl LaunchError {
    /// Short, stable name of the failure class, used as a structured log field.
    pub fn kind(&self) -> &'static str {
        match self {
            LaunchError::InvalidRequest(_) => "invalid_request",
            LaunchError::Spawn { .. } => "spawn_error",
            LaunchError::Activation { .. } => "activation_error",
            LaunchError::Timeout { .. } => "timeout",
        }
    }
}

/// Failure reported by an activation backend.
#[derive(Debug, Error)]
pub enum ActivationError {
    /// The process exists but has no window that could be raised.
    #[error("process {0} has no presentable window")]
    NoPresentableWindow(u32),

    /// The activation backend itself failed (e.g. the window manager is unreachable).
    #[error("activation backend error: {0}")]
    Backend(String),
}

/// Error type for configuration loading and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file exists but could not be read.
    #[error("Failed to read configuration file from {path:?}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The configuration file is not valid TOML or does not match the schema.
    #[error("Failed to parse configuration file: {0}")]
    ParseError(#[from] toml::de::Error),

    /// A value parsed fine but is not acceptable.
    #[error("Configuration validation failed: {0}")]
    ValidationError(String),

    /// An XDG base directory could not be determined.
    #[error("Could not determine base directory for {dir_type}")]
    DirectoryUnavailable { dir_type: String },
}

/// Error type for logging initialization.
#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("Failed to initialize logging: {0}")]
    InitializationError(String),

    #[error("Failed to set log filter: {0}")]
    FilterError(String),

    #[error("Logging I/O error: {0}")]
    IoError(#[from] io::Error),
}

/// Top-level error for launcher daemon setup.
#[derive(Debug, Error)]
pub enum LauncherError {
    #[error("Configuration Error: {0}")]
    Config(#[from] ConfigError),

    #[error("Logging Error: {0}")]
    Logging(#[from] LoggingError),

    #[error("D-Bus Error: {0}")]
    Dbus(#[from] DbusManagerError),
}
