use crate::{Error, Result};
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::net::{UnixListener, UnixStream};
use tokio::sync::{mpsc, oneshot};

/// Delay before the channel is rebound after a transport fault
const FAULT_BACKOFF: Duration = Duration::from_secs(1);

/// One URL handed to the picker loop.
///
/// `done` resolves when the session has finished, releasing the server for
/// the next connection.
#[derive(Debug)]
pub struct UrlDelivery {
    pub url: String,
    pub done: oneshot::Sender<()>,
}

/// Serves the inbound URL channel: one connection, one line, one picker
/// session at a time
pub struct UrlServer {
    socket_path: PathBuf,
    listener: UnixListener,
    deliveries: mpsc::Sender<UrlDelivery>,
}

impl UrlServer {
    /// Bind the well-known socket.
    ///
    /// A live server on the path is an error and fatal to startup; a
    /// leftover socket file from a dead process is replaced.
    pub async fn bind(
        socket_path: &Path,
        deliveries: mpsc::Sender<UrlDelivery>,
    ) -> Result<UrlServer> {
        let listener = Self::bind_socket(socket_path).await?;
        tracing::info!("Listening on {}", socket_path.display());

        Ok(UrlServer {
            socket_path: socket_path.to_path_buf(),
            listener,
            deliveries,
        })
    }

    async fn bind_socket(socket_path: &Path) -> Result<UnixListener> {
        if let Some(parent) = socket_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        match UnixListener::bind(socket_path) {
            Ok(listener) => Ok(listener),
            Err(e) if e.kind() == io::ErrorKind::AddrInUse => {
                if Self::socket_is_live(socket_path).await {
                    return Err(Error::AlreadyBound(socket_path.to_path_buf()));
                }
                std::fs::remove_file(socket_path)?;
                tracing::debug!("Replaced stale socket at {}", socket_path.display());
                Ok(UnixListener::bind(socket_path)?)
            }
            Err(e) => Err(Error::Io(e)),
        }
    }

    /// A connect probe tells a live server apart from a stale socket file
    async fn socket_is_live(socket_path: &Path) -> bool {
        UnixStream::connect(socket_path).await.is_ok()
    }

    /// Run the accept loop forever.
    ///
    /// Transport faults never end the loop: the channel is rebound after a
    /// short backoff. Losing the picker loop does end it; the service
    /// cannot dispatch without one.
    pub async fn run(self) -> Result<()> {
        let UrlServer {
            socket_path,
            mut listener,
            deliveries,
        } = self;

        loop {
            match Self::serve_one(&listener, &deliveries).await {
                Ok(()) => {}
                Err(e @ Error::Dispatch(_)) => return Err(e),
                Err(e) => {
                    tracing::warn!("Transport fault: {}", e);
                    tokio::time::sleep(FAULT_BACKOFF).await;
                    drop(listener);
                    listener = Self::rebind(&socket_path).await;
                }
            }
        }
    }

    /// Accept one connection, read its line, and hold off the next accept
    /// until the picker session completes
    async fn serve_one(
        listener: &UnixListener,
        deliveries: &mpsc::Sender<UrlDelivery>,
    ) -> Result<()> {
        let (stream, _) = listener.accept().await?;
        tracing::debug!("Dispatcher connected");

        let mut reader = BufReader::new(stream);
        let mut line = String::new();
        reader.read_line(&mut line).await?;
        // One line per connection; close before the picker session starts
        drop(reader);

        let url = line.trim_end_matches(['\r', '\n']).to_string();
        if url.is_empty() {
            tracing::debug!("Empty delivery; ignoring connection");
            return Ok(());
        }

        tracing::info!("Received URL: {}", url);
        let (done_tx, done_rx) = oneshot::channel();
        deliveries
            .send(UrlDelivery {
                url,
                done: done_tx,
            })
            .await
            .map_err(|_| Error::Dispatch("picker loop is gone".to_string()))?;

        if done_rx.await.is_err() {
            tracing::warn!("Session ended without a completion signal");
        }
        Ok(())
    }

    async fn rebind(socket_path: &Path) -> UnixListener {
        loop {
            match Self::bind_socket(socket_path).await {
                Ok(listener) => {
                    tracing::info!("Rebound {}", socket_path.display());
                    return listener;
                }
                Err(e) => {
                    tracing::warn!("Rebind failed: {}", e);
                    tokio::time::sleep(FAULT_BACKOFF).await;
                }
            }
        }
    }
}
