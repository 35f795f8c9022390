use crate::config::{BusKind, DbusConfig};
use crate::dbus_interfaces::LauncherService;
use thiserror::Error;
use zbus::names::WellKnownName;
use zbus::zvariant::ObjectPath;
use zbus::{Connection, Error as ZbusError};

#[derive(Debug, Error)]
pub enum DbusManagerError {
    #[error("D-Bus connection failed: {0}")]
    ConnectionFailed(#[from] ZbusError),
    #[error("Failed to request D-Bus service name '{name}': {source}")]
    NameRequestFailed { name: String, source: ZbusError },
    #[error("Failed to serve D-Bus object at path '{path}': {source}")]
    ServeAtFailed { path: String, source: ZbusError },
}

pub type Result<T> = std::result::Result<T, DbusManagerError>;

/// Owns the launcher's bus connection and registers its service on it.
#[derive(Clone)]
pub struct DbusServiceManager {
    connection: Connection,
}

impl DbusServiceManager {
    /// Connects to the bus selected in `config`.
    pub async fn connect(config: &DbusConfig) -> Result<Self> {
        tracing::info!(bus = ?config.bus, "Initializing DbusServiceManager");
        let connection = match config.bus {
            BusKind::Session => Connection::session().await?,
            BusKind::System => Connection::system().await?,
        };
        tracing::info!(
            "Connected to D-Bus. Unique name: {}",
            connection
                .unique_name()
                .map_or_else(|| "<unknown>".to_string(), |n| n.to_string())
        );
        Ok(Self { connection })
    }

    /// Shared connection, also used for outgoing proxies such as the window manager.
    pub fn connection(&self) -> Connection {
        self.connection.clone()
    }

    pub async fn request_name(&self, name: &str) -> Result<()> {
        let well_known_name = WellKnownName::try_from(name).map_err(|e| DbusManagerError::NameRequestFailed {
            name: name.to_string(),
            source: ZbusError::from(e),
        })?;

        tracing::info!("Requesting D-Bus name: {}", name);
        self.connection
            .request_name(well_known_name)
            .await
            .map_err(|e| DbusManagerError::NameRequestFailed {
                name: name.to_string(),
                source: e,
            })?;
        tracing::info!("Successfully requested D-Bus name: {}", name);
        Ok(())
    }

    /// Registers `service` at the configured object path, then claims the
    /// configured well-known name so callers never see the name without the object.
    pub async fn serve_launcher(&self, service: LauncherService, config: &DbusConfig) -> Result<()> {
        let path = ObjectPath::try_from(config.object_path.as_str()).map_err(|e| DbusManagerError::ServeAtFailed {
            path: config.object_path.clone(),
            source: ZbusError::from(e),
        })?;

        let added = self
            .connection
            .object_server()
            .at(path, service)
            .await
            .map_err(|e| DbusManagerError::ServeAtFailed {
                path: config.object_path.clone(),
                source: e,
            })?;
        if !added {
            tracing::warn!(path = %config.object_path, "A launcher interface was already served at this path");
        }
        tracing::info!(path = %config.object_path, "LauncherService registered with the object server");

        self.request_name(&config.service_name).await
    }
}
