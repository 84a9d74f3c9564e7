//! tmux-statusd - background status daemon for the tmux status bar
//!
//! Samples host telemetry (CPU, RAM, temperature, battery, clock, hostname)
//! once a second, renders color-coded fragments into a shared cache and
//! serves the composed status line over a Unix socket. Requests never
//! trigger sampling; they read the latest cached render.

mod cache;
mod config;
mod metrics;
mod render;
mod server;
mod theme;
mod updater;

use anyhow::{Context, Result};
use tokio::signal::unix::{signal, SignalKind};
use tracing::{error, info};

use crate::cache::StatusCache;
use crate::config::Config;
use crate::server::StatusServer;

/// Exit code for SIGINT, matching shell convention (128 + signal)
const EXIT_INTERRUPTED: i32 = 130;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "tmux_statusd=info".to_string()),
        ))
        .init();

    match run().await {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            error!("fatal: {e:#}");
            std::process::exit(1);
        }
    }
}

async fn run() -> Result<i32> {
    info!("tmux-statusd v{} starting", env!("CARGO_PKG_VERSION"));

    let config = Config::load().await.context("Failed to load configuration")?;

    let has_battery = metrics::probe_battery(&config.power_supply_dir);
    info!(
        "battery {}",
        if has_battery { "present" } else { "absent, skipping battery source" }
    );

    let cache = StatusCache::new(has_battery);

    let server = StatusServer::bind(&config.socket_path, cache.clone())
        .await
        .context("Failed to set up status socket")?;
    let socket_path = config.socket_path.clone();

    let updater = tokio::spawn(updater::run(cache, config));

    let mut sigint = signal(SignalKind::interrupt()).context("Failed to install SIGINT handler")?;
    let mut sigusr1 =
        signal(SignalKind::user_defined1()).context("Failed to install SIGUSR1 handler")?;
    let mut sigusr2 =
        signal(SignalKind::user_defined2()).context("Failed to install SIGUSR2 handler")?;

    // Every exit path funnels through here so the socket is unlinked
    // exactly once before the process dies.
    let exit_code = tokio::select! {
        _ = sigint.recv() => {
            info!("interrupted");
            EXIT_INTERRUPTED
        }
        _ = sigusr1.recv() => {
            info!("received SIGUSR1, shutting down");
            0
        }
        _ = sigusr2.recv() => {
            info!("received SIGUSR2, shutting down");
            0
        }
        result = updater => {
            match result {
                Ok(Ok(())) => error!("update loop ended unexpectedly"),
                Ok(Err(e)) => error!("update loop failed: {e:#}"),
                Err(e) => error!("update loop panicked: {e}"),
            }
            1
        }
        result = server.run() => {
            if let Err(e) = result {
                error!("socket server failed: {e}");
            }
            1
        }
    };

    server::unlink_socket(&socket_path);
    Ok(exit_code)
}
