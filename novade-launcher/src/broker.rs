//! The launch/activation decision engine.
//!
//! For each request the broker either starts the executable or, when a
//! verified-live instance is already known, activates that instance:
//!
//! 1. Validate the executable identity (`Failed(InvalidRequest)` otherwise,
//!    with no registry or collaborator access).
//! 2. Take the per-identity lock, so two requests for the same identity never
//!    both observe "not running".
//! 3. Look the identity up. A cached entry is only trusted after the
//!    [`ProcessProbe`] confirms the pid is alive and still runs the same
//!    executable; a stale entry is removed.
//! 4. Live: activate it. The request's arguments are ignored on this path and
//!    the record stays as it was, whether activation succeeds or not.
//! 5. Not live: spawn and record the new pid with the request's arguments.
//!    A failed spawn leaves the registry untouched.
//!
//! Spawner and activator calls are bounded by the configured timeouts and
//! report `Failed(Timeout)` instead of wedging the identity.

use crate::config::BrokerConfig;
use crate::error::LaunchError;
use crate::identity_locks::IdentityLocks;
use crate::process::{Activator, ProcessProbe, ProcessSpawner};
use crate::registry::RunningRegistry;
use crate::types::{ExecutableIdentity, LaunchOutcome, LaunchRequest, ProcessRecord};
use std::sync::Arc;
use std::time::Duration;

pub struct LaunchBroker {
    registry: RunningRegistry,
    locks: IdentityLocks,
    spawner: Arc<dyn ProcessSpawner>,
    activator: Arc<dyn Activator>,
    probe: Arc<dyn ProcessProbe>,
    spawn_timeout: Duration,
    activation_timeout: Duration,
}

impl LaunchBroker {
    pub fn new(
        spawner: Arc<dyn ProcessSpawner>,
        activator: Arc<dyn Activator>,
        probe: Arc<dyn ProcessProbe>,
        config: &BrokerConfig,
    ) -> Self {
        tracing::info!(
            spawn_timeout_ms = config.spawn_timeout_ms,
            activation_timeout_ms = config.activation_timeout_ms,
            "Creating LaunchBroker"
        );
        Self {
            registry: RunningRegistry::new(),
            locks: IdentityLocks::new(),
            spawner,
            activator,
            probe,
            spawn_timeout: config.spawn_timeout(),
            activation_timeout: config.activation_timeout(),
        }
    }

    /// Handles one launch request. Never panics on collaborator failure; every
    /// problem is reported as [`LaunchOutcome::Failed`].
    pub async fn handle(&self, request: LaunchRequest) -> LaunchOutcome {
        let identity = match ExecutableIdentity::parse(&request.executable) {
            Ok(identity) => identity,
            Err(err) => {
                tracing::warn!(executable = ?request.executable, "Rejected launch request: {}", err);
                return LaunchOutcome::Failed(err);
            }
        };

        let _guard = self.locks.acquire(&identity).await;

        if let Some(record) = self.registry.lookup(&identity) {
            if self.probe.is_running(record.pid, &identity) {
                return self.activate_record(&record).await;
            }
            tracing::info!(
                executable = %identity,
                pid = record.pid,
                "Removing stale registry entry; process is gone"
            );
            self.registry.remove(&identity);
        }

        self.spawn_and_record(identity, request.arguments).await
    }

    /// Local command surface: start `executable` with `arguments`, or activate
    /// its running instance.
    pub async fn launch(&self, executable: &str, arguments: Vec<String>) -> LaunchOutcome {
        self.handle(LaunchRequest::new(executable, arguments)).await
    }

    /// Local command surface: bring `executable` to the foreground. Like any
    /// request, this starts it (without arguments) when it is not running.
    pub async fn activate(&self, executable: &str) -> LaunchOutcome {
        self.handle(LaunchRequest::new(executable, Vec::new())).await
    }

    /// Local query surface. Performs the same liveness verification as
    /// [`handle`](Self::handle) and evicts a stale entry it finds.
    pub async fn is_running(&self, executable: &str) -> bool {
        let Ok(identity) = ExecutableIdentity::parse(executable) else {
            return false;
        };
        let _guard = self.locks.acquire(&identity).await;

        match self.registry.lookup(&identity) {
            Some(record) if self.probe.is_running(record.pid, &identity) => true,
            Some(record) => {
                tracing::info!(
                    executable = %identity,
                    pid = record.pid,
                    "Removing stale registry entry during status query"
                );
                self.registry.remove(&identity);
                false
            }
            None => false,
        }
    }

    /// Cached record for `executable`, without liveness verification.
    pub fn lookup(&self, executable: &str) -> Option<ProcessRecord> {
        let identity = ExecutableIdentity::parse(executable).ok()?;
        self.registry.lookup(&identity)
    }

    /// Registry contents for diagnostics, oldest launch first.
    pub fn snapshot(&self) -> Vec<ProcessRecord> {
        self.registry.snapshot()
    }

    async fn activate_record(&self, record: &ProcessRecord) -> LaunchOutcome {
        let pid = record.pid;
        let identity = &record.identity;
        match tokio::time::timeout(self.activation_timeout, self.activator.activate(pid, identity)).await {
            Ok(Ok(())) => {
                tracing::info!(executable = %identity, pid, "Activated running instance");
                LaunchOutcome::Activated(pid)
            }
            Ok(Err(source)) => {
                tracing::warn!(executable = %identity, pid, "Activation failed: {}", source);
                LaunchOutcome::Failed(LaunchError::Activation { pid, source })
            }
            Err(_) => {
                tracing::warn!(
                    executable = %identity,
                    pid,
                    timeout_ms = self.activation_timeout.as_millis() as u64,
                    "Activation timed out"
                );
                LaunchOutcome::Failed(LaunchError::Timeout {
                    operation: "activation",
                    after: self.activation_timeout,
                })
            }
        }
    }

    async fn spawn_and_record(&self, identity: ExecutableIdentity, arguments: Vec<String>) -> LaunchOutcome {
        match tokio::time::timeout(self.spawn_timeout, self.spawner.spawn(&identity, &arguments)).await {
            Ok(Ok(spawned)) => {
                tracing::info!(executable = %identity, pid = spawned.pid, ?arguments, "Launched new instance");
                self.registry.record(identity, spawned.pid, arguments);
                LaunchOutcome::Launched(spawned.pid)
            }
            Ok(Err(source)) => {
                tracing::error!(executable = %identity, "Spawn failed: {}", source);
                LaunchOutcome::Failed(LaunchError::Spawn {
                    identity: identity.into(),
                    source,
                })
            }
            Err(_) => {
                tracing::error!(
                    executable = %identity,
                    timeout_ms = self.spawn_timeout.as_millis() as u64,
                    "Spawn timed out"
                );
                LaunchOutcome::Failed(LaunchError::Timeout {
                    operation: "spawn",
                    after: self.spawn_timeout,
                })
            }
        }
    }
}
