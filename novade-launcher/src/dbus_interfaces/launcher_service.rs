//! # Launcher D-Bus Service
//!
//! Implements `org.novade.Launcher1`, the IPC entrypoint through which other
//! processes of the session (file-association and URL-handler shims, panels,
//! the `novade-launch` tool) submit launch requests.
//!
//! The wire payload of `HandleLaunchRequest` is positional:
//! `[executable, arg1, arg2, ...]`. Any process on the bus may call it; the
//! trust boundary is the user's session bus.

use crate::broker::LaunchBroker;
use crate::error::LaunchError;
use crate::types::{LaunchOutcome, LaunchRequest};
use std::sync::Arc;
use zbus::dbus_interface;
use zbus::fdo::Error as FdoError;

pub const LAUNCHER_INTERFACE_NAME: &str = "org.novade.Launcher1";

/// D-Bus facade over a shared [`LaunchBroker`]. Holds no state of its own.
#[derive(Clone)]
pub struct LauncherService {
    broker: Arc<LaunchBroker>,
}

impl LauncherService {
    pub fn new(broker: Arc<LaunchBroker>) -> Self {
        Self { broker }
    }

    /// Parses a wire payload and runs it through the broker.
    ///
    /// Only a malformed payload is an error here; a broker `Failed` outcome is
    /// logged and returned as an outcome.
    pub async fn submit(&self, payload: Vec<String>) -> Result<LaunchOutcome, LaunchError> {
        let request = LaunchRequest::from_wire(payload)?;
        let executable = request.executable.clone();
        let outcome = self.broker.handle(request).await;
        if let LaunchOutcome::Failed(err) = &outcome {
            tracing::error!(
                executable = %executable,
                kind = err.kind(),
                "Launch request from D-Bus failed: {}",
                err
            );
        }
        Ok(outcome)
    }
}

#[dbus_interface(name = "org.novade.Launcher1")]
impl LauncherService {
    /// Submits `[executable, args...]`. Fire-and-forget: launch failures are
    /// logged by the service and not returned. An empty array is answered with
    /// `org.freedesktop.DBus.Error.InvalidArgs`.
    async fn handle_launch_request(&self, arguments: Vec<String>) -> zbus::fdo::Result<()> {
        tracing::debug!(?arguments, "HandleLaunchRequest called");
        match self.submit(arguments).await {
            Ok(_) => Ok(()),
            Err(err) => {
                tracing::warn!("Rejected D-Bus launch payload: {}", err);
                Err(FdoError::InvalidArgs(err.to_string()))
            }
        }
    }

    /// Whether `executable` is running, verified against the OS.
    async fn is_running(&self, executable: String) -> bool {
        self.broker.is_running(&executable).await
    }

    /// Registry snapshot as `(executable, pid, launched_at_unix_ms, last_arguments)`,
    /// oldest launch first. Entries are not liveness-checked.
    async fn list_running(&self) -> Vec<(String, u32, i64, Vec<String>)> {
        self.broker
            .snapshot()
            .iter()
            .map(|record| record.to_wire())
            .collect()
    }
}
