use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use urlpick_core::paths;
use urlpick_ipc::{ServiceOptions, UrlClient};

#[derive(Parser)]
#[command(name = "urlpick")]
#[command(version)]
#[command(
    about = "Forwards an opened URL to the urlpick background service",
    long_about = "Registered as the system URL handler, urlpick hands each opened URL to the \
                  background service, starting the service first when it is not running. The \
                  service then shows the browser/profile picker and launches the chosen browser."
)]
struct Cli {
    /// The URL to open; without one this invocation is a no-op
    #[arg(value_name = "URL")]
    url: Option<String>,

    /// Path of the service's URL socket
    #[arg(long, env = "URLPICK_SOCKET")]
    socket: Option<PathBuf>,

    /// Settings path forwarded to a service this invocation starts
    #[arg(long, env = "URLPICK_SETTINGS")]
    settings: Option<PathBuf>,

    /// Lock-file path forwarded to a service this invocation starts
    #[arg(long, env = "URLPICK_LOCK")]
    lock_file: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging();

    let Some(url) = cli.url else {
        tracing::info!("No URL given; nothing to dispatch");
        return Ok(());
    };

    let socket_path = cli.socket.unwrap_or_else(paths::default_socket_path);
    let client = UrlClient::with_options(
        socket_path,
        ServiceOptions {
            settings: cli.settings,
            lock_file: cli.lock_file,
        },
    );

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    if let Err(e) = runtime.block_on(client.deliver(&url)) {
        tracing::error!("Could not deliver {}: {}", url, e);
        std::process::exit(1);
    }

    tracing::debug!("Delivered {}", url);
    Ok(())
}

fn init_logging() {
    use tracing_subscriber::EnvFilter;

    let filter = std::env::var("URLPICK_LOG").unwrap_or_else(|_| "info".to_string());

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .without_time()
        .init();
}
