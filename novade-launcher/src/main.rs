// NovaDE Launcher daemon entry point

use anyhow::{bail, Context, Result};
use novade_launcher::config::{ConfigLoader, LauncherConfig};
use novade_launcher::daemon::{wait_for_shutdown_signal, LauncherDaemon};
use novade_launcher::logging::{init_logging, init_minimal_logging};
use std::path::PathBuf;
use tracing::{error, info, warn};

fn config_path_from_args() -> Result<Option<PathBuf>> {
    let mut args = std::env::args().skip(1);
    let mut path = None;
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" | "-c" => {
                let value = args.next().context("--config requires a path")?;
                path = Some(PathBuf::from(value));
            }
            other => bail!("Unknown argument: {}", other),
        }
    }
    Ok(path)
}

/// Returns the configuration plus the reason defaults were used, if any. The
/// reason is logged once a subscriber exists.
fn load_config(path: Option<PathBuf>) -> Result<(LauncherConfig, Option<String>)> {
    match path {
        // An explicitly requested file must be usable.
        Some(path) => ConfigLoader::load_from_path(&path)
            .map(|config| (config, None))
            .with_context(|| format!("Failed to load configuration from {}", path.display())),
        None => match ConfigLoader::load() {
            Ok(config) => Ok((config, None)),
            Err(e) => Ok((LauncherConfig::default(), Some(e.to_string()))),
        },
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let (config, fallback_reason) = load_config(config_path_from_args()?)?;

    if let Err(e) = init_logging(&config.logging) {
        init_minimal_logging();
        warn!("Configured logging unavailable, using stderr: {}", e);
    }
    if let Some(reason) = fallback_reason {
        error!("Failed to load launcher configuration, using defaults: {}", reason);
    }

    info!("Starting NovaDE launcher...");
    let daemon = LauncherDaemon::start(&config)
        .await
        .context("Failed to start launcher daemon")?;

    wait_for_shutdown_signal()
        .await
        .context("Failed to listen for shutdown signals")?;

    info!(
        tracked = daemon.broker().snapshot().len(),
        "NovaDE launcher shutting down; launched applications keep running."
    );
    drop(daemon);
    Ok(())
}
