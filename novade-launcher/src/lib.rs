//! # NovaDE Launcher (`novade-launcher`)
//!
//! The launch broker of the NovaDE session. Every request to open an
//! application, whether it comes from a file-association shim, a panel or a
//! terminal, is routed here and turned into exactly one of two actions:
//!
//! - **launch**: the executable has no verified-live instance, so a new
//!   process is spawned and recorded;
//! - **activate**: a live instance is known, so its window is brought to the
//!   foreground instead of starting a duplicate.
//!
//! ## Layout
//!
//! - [`broker`]: the decision engine ([`LaunchBroker`]).
//! - [`registry`] and [`identity_locks`]: the running-process map and the
//!   per-executable serialization that keeps the decision race-free.
//! - [`process`]: OS collaborators (spawning, `/proc` liveness, window activation).
//! - [`dbus_interfaces`], [`dbus_integration`], [`dbus_clients`]: the
//!   `org.novade.Launcher1` service, its connection manager and typed proxies.
//! - [`config`], [`logging`], [`error`], [`utils`]: ambient infrastructure.
//! - [`daemon`]: wiring used by the `novade-launcher` binary.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use novade_launcher::config::ConfigLoader;
//! use novade_launcher::daemon::{wait_for_shutdown_signal, LauncherDaemon};
//!
//! let config = ConfigLoader::load()?;
//! novade_launcher::logging::init_logging(&config.logging)?;
//! let _daemon = LauncherDaemon::start(&config).await?;
//! wait_for_shutdown_signal().await?;
//! ```

pub mod broker;
pub mod config;
pub mod daemon;
pub mod dbus_clients;
pub mod dbus_integration;
pub mod dbus_interfaces;
pub mod error;
pub mod identity_locks;
pub mod logging;
pub mod process;
pub mod registry;
pub mod types;
pub mod utils;

pub use broker::LaunchBroker;
pub use config::{ConfigLoader, LauncherConfig};
pub use error::{ActivationError, ConfigError, LaunchError, LauncherError, LoggingError};
pub use registry::RunningRegistry;
pub use types::{ExecutableIdentity, LaunchOutcome, LaunchRequest, ProcessRecord};
