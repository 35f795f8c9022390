//! Wiring of the long-running launcher process.

use crate::broker::LaunchBroker;
use crate::config::LauncherConfig;
use crate::dbus_integration::DbusServiceManager;
use crate::dbus_interfaces::LauncherService;
use crate::error::LauncherError;
use crate::process::{DbusActivator, ProcfsProbe, TokioProcessSpawner};
use std::sync::Arc;

/// A broker served on D-Bus. Dropping it closes the connection, which
/// releases the well-known name.
pub struct LauncherDaemon {
    broker: Arc<LaunchBroker>,
    manager: DbusServiceManager,
}

impl LauncherDaemon {
    /// Connects to the configured bus, builds the broker from the production
    /// collaborators and publishes `org.novade.Launcher1`.
    pub async fn start(config: &LauncherConfig) -> Result<Self, LauncherError> {
        let manager = DbusServiceManager::connect(&config.dbus).await?;

        let broker = Arc::new(LaunchBroker::new(
            Arc::new(TokioProcessSpawner::new()),
            Arc::new(DbusActivator::new(manager.connection())),
            Arc::new(ProcfsProbe::new()),
            &config.broker,
        ));

        manager
            .serve_launcher(LauncherService::new(broker.clone()), &config.dbus)
            .await?;

        tracing::info!(
            service = %config.dbus.service_name,
            path = %config.dbus.object_path,
            "Launcher daemon is ready"
        );
        Ok(Self { broker, manager })
    }

    pub fn broker(&self) -> Arc<LaunchBroker> {
        self.broker.clone()
    }

    pub fn connection(&self) -> zbus::Connection {
        self.manager.connection()
    }
}

/// Resolves on SIGINT or SIGTERM.
pub async fn wait_for_shutdown_signal() -> std::io::Result<()> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let mut terminate = signal(SignalKind::terminate())?;
        tokio::select! {
            result = tokio::signal::ctrl_c() => {
                result?;
                tracing::info!("SIGINT received, shutting down launcher.");
            }
            _ = terminate.recv() => {
                tracing::info!("SIGTERM received, shutting down launcher.");
            }
        }
        Ok(())
    }

    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c().await?;
        tracing::info!("Ctrl+C received, shutting down launcher.");
        Ok(())
    }
}
