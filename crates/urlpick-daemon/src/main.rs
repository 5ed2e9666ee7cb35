use anyhow::Result;
use clap::Parser;
use std::path::{Path, PathBuf};
use tokio::sync::mpsc;
use urlpick_core::{Inventory, SettingsStore, paths};
use urlpick_discovery::DiscoveryCoordinator;
use urlpick_ipc::{SingletonGuard, UrlServer};

mod launch;
mod picker;
mod ui;

/// Deliveries the server may queue while a picker session is open
const DELIVERY_QUEUE: usize = 8;

#[derive(Parser)]
#[command(name = "urlpickd")]
#[command(version)]
#[command(
    about = "Background service for urlpick: discovers installed browsers and routes URLs to a chosen profile"
)]
struct Cli {
    /// Path of the inbound URL socket
    #[arg(long, env = "URLPICK_SOCKET")]
    socket: Option<PathBuf>,

    /// Path of the persisted browser inventory
    #[arg(long, env = "URLPICK_SETTINGS")]
    settings: Option<PathBuf>,

    /// Path of the single-instance lock file
    #[arg(long, env = "URLPICK_LOCK")]
    lock_file: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging();

    let socket_path = cli.socket.unwrap_or_else(paths::default_socket_path);
    let settings_path = cli.settings.unwrap_or_else(paths::default_settings_path);
    let lock_path = cli.lock_file.unwrap_or_else(paths::default_lock_path);

    // The guard must outlive the server; a second instance stops here,
    // before any scan or bind.
    let _guard = match SingletonGuard::try_acquire(&lock_path)? {
        Some(guard) => guard,
        None => {
            tracing::info!("Another instance is already running; exiting");
            return Ok(());
        }
    };

    let inventory = DiscoveryCoordinator::new(SettingsStore::new(settings_path)).run();
    tracing::info!(
        "Discovery complete: {} browsers, {} profiles",
        inventory.browsers.len(),
        inventory.profile_count()
    );

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(serve(&socket_path, inventory))
}

/// Bind the URL channel and serve it until a shutdown signal arrives.
///
/// Picker sessions run on their own thread; the server hands each URL over
/// and waits for the session before accepting again.
async fn serve(socket_path: &Path, inventory: Inventory) -> Result<()> {
    let (deliveries, sessions) = mpsc::channel(DELIVERY_QUEUE);
    let session_loop = ui::spawn_session_loop(inventory, picker::select_picker(), sessions);

    let server = UrlServer::bind(socket_path, deliveries).await?;

    let outcome = tokio::select! {
        result = server.run() => result.map_err(Into::into),
        _ = shutdown_signal() => {
            tracing::info!("Shutdown signal received");
            Ok(())
        }
    };

    // The select dropped the server and with it the delivery sender; the
    // session loop drains and ends on its own.
    let _ = std::fs::remove_file(socket_path);
    if session_loop.join().is_err() {
        tracing::warn!("Picker session loop panicked during shutdown");
    }

    outcome
}

#[cfg(unix)]
async fn shutdown_signal() {
    use tokio::signal::unix::{SignalKind, signal};

    let mut sigterm = match signal(SignalKind::terminate()) {
        Ok(sigterm) => sigterm,
        Err(e) => {
            tracing::warn!("Cannot listen for SIGTERM: {}", e);
            let _ = tokio::signal::ctrl_c().await;
            return;
        }
    };

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {}
        _ = sigterm.recv() => {}
    }
}

#[cfg(not(unix))]
async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}

fn init_logging() {
    use tracing_subscriber::EnvFilter;

    let filter = std::env::var("URLPICK_LOG").unwrap_or_else(|_| "info".to_string());

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .init();
}
