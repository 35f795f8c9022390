// novade-launch: forwards a launch request to the running NovaDE launcher.
//
//   novade-launch <executable> [args...]
//   novade-launch --status <executable>
//   novade-launch --list

use anyhow::{bail, Context, Result};
use chrono::{TimeZone, Utc};
use novade_launcher::dbus_clients::LauncherProxy;
use novade_launcher::logging::init_minimal_logging;
use std::process::ExitCode;
use zbus::Connection;

const USAGE: &str = "Usage: novade-launch <executable> [args...] | --status <executable> | --list";

enum Command {
    Launch(Vec<String>),
    Status(String),
    List,
}

fn parse_args(args: Vec<String>) -> Result<Command> {
    let mut iter = args.into_iter();
    match iter.next().as_deref() {
        None => bail!("{}", USAGE),
        Some("--status") => {
            let executable = iter.next().context("--status requires an executable")?;
            Ok(Command::Status(executable))
        }
        Some("--list") => Ok(Command::List),
        Some("--") => {
            let payload: Vec<String> = iter.collect();
            if payload.is_empty() {
                bail!("{}", USAGE);
            }
            Ok(Command::Launch(payload))
        }
        Some(executable) => {
            let mut payload = vec![executable.to_string()];
            payload.extend(iter);
            Ok(Command::Launch(payload))
        }
    }
}

/// `Ok(false)` means the query succeeded with a negative answer.
async fn run(command: Command) -> Result<bool> {
    let connection = Connection::session()
        .await
        .context("Failed to connect to the session bus")?;
    let proxy = LauncherProxy::new(&connection)
        .await
        .context("Failed to create launcher proxy")?;

    match command {
        Command::Launch(payload) => {
            let arguments: Vec<&str> = payload.iter().map(String::as_str).collect();
            tracing::debug!(?arguments, "Forwarding launch request");
            proxy
                .handle_launch_request(&arguments)
                .await
                .with_context(|| format!("Launcher rejected request for '{}'", payload[0]))?;
        }
        Command::Status(executable) => {
            let running = proxy
                .is_running(&executable)
                .await
                .context("Failed to query launcher")?;
            println!("{}: {}", executable, if running { "running" } else { "not running" });
            return Ok(running);
        }
        Command::List => {
            let entries = proxy.list_running().await.context("Failed to query launcher")?;
            for (executable, pid, launched_at_ms, arguments) in entries {
                let launched_at = Utc
                    .timestamp_millis_opt(launched_at_ms)
                    .single()
                    .map_or_else(|| launched_at_ms.to_string(), |t| t.to_rfc3339());
                println!("{}\t{}\t{}\t{}", pid, launched_at, executable, arguments.join(" "));
            }
        }
    }
    Ok(true)
}

#[tokio::main]
async fn main() -> ExitCode {
    init_minimal_logging();

    let command = match parse_args(std::env::args().skip(1).collect()) {
        Ok(command) => command,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::from(2);
        }
    };

    match run(command).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            tracing::error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}
