//! Starting new application processes.

use crate::types::ExecutableIdentity;
use async_trait::async_trait;
use std::io;
use std::process::Stdio;
use tokio::process::Command;

/// A process the spawner has just created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpawnedProcess {
    pub pid: u32,
}

/// Creates OS processes on behalf of the broker.
#[async_trait]
pub trait ProcessSpawner: Send + Sync {
    /// Starts `identity` with `arguments`.
    ///
    /// # Errors
    ///
    /// Returns the OS error when the process could not be created
    /// (path not found, permission denied, ...).
    async fn spawn(&self, identity: &ExecutableIdentity, arguments: &[String]) -> io::Result<SpawnedProcess>;
}

/// Spawns detached desktop applications with `tokio::process`.
///
/// The child gets its own process group, so signals aimed at the launcher do
/// not take launched applications down with it, and it is not killed when the
/// handle is dropped. A background task waits on the child so an exited
/// application is reaped instead of lingering as a zombie. That task only logs;
/// the registry learns about the exit on the next request for the identity.
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioProcessSpawner;

impl TokioProcessSpawner {
    pub fn new() -> Self {
        TokioProcessSpawner
    }
}

#[async_trait]
impl ProcessSpawner for TokioProcessSpawner {
    async fn spawn(&self, identity: &ExecutableIdentity, arguments: &[String]) -> io::Result<SpawnedProcess> {
        let mut command = Command::new(identity.as_path());
        command
            .args(arguments)
            .stdin(Stdio::null())
            .kill_on_drop(false);
        #[cfg(unix)]
        command.process_group(0);

        tracing::debug!(executable = %identity, ?arguments, "Spawning process");
        let mut child = command.spawn()?;
        let pid = child.id().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::Other,
                "process exited before its pid could be read",
            )
        })?;

        let identity = identity.clone();
        tokio::spawn(async move {
            match child.wait().await {
                Ok(status) => {
                    tracing::info!(executable = %identity, pid, %status, "Launched process exited")
                }
                Err(e) => {
                    tracing::warn!(executable = %identity, pid, "Failed to wait for launched process: {}", e)
                }
            }
        });

        Ok(SpawnedProcess { pid })
    }
}
