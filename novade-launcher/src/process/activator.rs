//! Bringing an already-running application to the foreground.

use crate::dbus_clients::window_manager::WindowManagerProxy;
use crate::error::ActivationError;
use crate::types::ExecutableIdentity;
use async_trait::async_trait;
use zbus::Connection;

/// Raises the primary interface of a running process.
///
/// Failure is reported to the broker but never implies the process died.
#[async_trait]
pub trait Activator: Send + Sync {
    async fn activate(&self, pid: u32, identity: &ExecutableIdentity) -> Result<(), ActivationError>;
}

/// Asks the NovaDE window manager over D-Bus to focus the process's toplevel.
#[derive(Debug, Clone)]
pub struct DbusActivator {
    connection: Connection,
}

impl DbusActivator {
    pub fn new(connection: Connection) -> Self {
        Self { connection }
    }
}

#[async_trait]
impl Activator for DbusActivator {
    async fn activate(&self, pid: u32, identity: &ExecutableIdentity) -> Result<(), ActivationError> {
        let proxy = WindowManagerProxy::new(&self.connection)
            .await
            .map_err(|e| ActivationError::Backend(e.to_string()))?;

        tracing::debug!(executable = %identity, pid, "Requesting window activation");
        let raised = proxy
            .activate_by_pid(pid)
            .await
            .map_err(|e| ActivationError::Backend(e.to_string()))?;

        if raised {
            Ok(())
        } else {
            Err(ActivationError::NoPresentableWindow(pid))
        }
    }
}
