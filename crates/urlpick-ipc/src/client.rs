use crate::{Error, Result};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::Duration;
use sysinfo::{ProcessesToUpdate, System};
use tokio::io::AsyncWriteExt;
use tokio::net::UnixStream;
use urlpick_core::paths::SERVICE_BINARY;

/// Upper bound on one connect attempt against a running service
const CONNECT_TIMEOUT: Duration = Duration::from_millis(1500);

/// How long a freshly spawned service gets to bind its socket
const SPAWN_GRACE: Duration = Duration::from_secs(2);

/// Poll interval while a freshly spawned service binds its socket
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Path overrides forwarded to a service the client spawns, so an
/// overridden dispatcher starts a matching service
#[derive(Debug, Default, Clone)]
pub struct ServiceOptions {
    pub settings: Option<PathBuf>,
    pub lock_file: Option<PathBuf>,
}

/// Delivers URLs to the background service, starting it first when absent
pub struct UrlClient {
    socket_path: PathBuf,
    options: ServiceOptions,
}

impl UrlClient {
    pub fn new(socket_path: PathBuf) -> Self {
        Self {
            socket_path,
            options: ServiceOptions::default(),
        }
    }

    pub fn with_options(socket_path: PathBuf, options: ServiceOptions) -> Self {
        Self {
            socket_path,
            options,
        }
    }

    /// Deliver one URL as a single newline-terminated line.
    ///
    /// No acknowledgment is awaited; an error at any stage is reported to
    /// the caller and never hangs past the connect timeout.
    pub async fn deliver(&self, url: &str) -> Result<()> {
        let stream = if Self::service_running() {
            self.connect().await?
        } else {
            tracing::debug!("Service not running; starting it");
            let binary = Self::locate_service_binary()?;
            self.spawn_service(&binary)?;
            self.connect_after_spawn().await?
        };

        Self::send_line(stream, url).await
    }

    /// True when a process with the service's exact binary name exists
    fn service_running() -> bool {
        let mut system = System::new();
        system.refresh_processes(ProcessesToUpdate::All, true);
        Self::process_running(&system, SERVICE_BINARY.as_ref())
    }

    fn process_running(system: &System, name: &OsStr) -> bool {
        system.processes_by_exact_name(name).next().is_some()
    }

    /// The service ships beside the dispatcher. A missing binary is an
    /// immediate error, never a retry.
    fn locate_service_binary() -> Result<PathBuf> {
        let current = std::env::current_exe()?;
        let candidate = match current.parent() {
            Some(dir) => dir.join(SERVICE_BINARY),
            None => return Err(Error::ServiceBinaryNotFound(current)),
        };

        if candidate.is_file() {
            Ok(candidate)
        } else {
            Err(Error::ServiceBinaryNotFound(candidate))
        }
    }

    /// Start the service detached, with stdio on the null device
    fn spawn_service(&self, binary: &Path) -> Result<()> {
        tracing::info!("Starting service: {}", binary.display());

        let mut command = Command::new(binary);
        command
            .arg("--socket")
            .arg(&self.socket_path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        if let Some(settings) = &self.options.settings {
            command.arg("--settings").arg(settings);
        }
        if let Some(lock_file) = &self.options.lock_file {
            command.arg("--lock-file").arg(lock_file);
        }
        command.spawn()?;

        Ok(())
    }

    /// Poll-connect while the fresh service starts, then fall back to the
    /// regular bounded attempt
    async fn connect_after_spawn(&self) -> Result<UnixStream> {
        let attempts = (SPAWN_GRACE.as_millis() / POLL_INTERVAL.as_millis()).max(1);
        for _ in 0..attempts {
            if let Ok(stream) = UnixStream::connect(&self.socket_path).await {
                return Ok(stream);
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }

        self.connect().await
    }

    /// One connect attempt against a service believed to be running
    async fn connect(&self) -> Result<UnixStream> {
        match tokio::time::timeout(CONNECT_TIMEOUT, UnixStream::connect(&self.socket_path)).await
        {
            Ok(Ok(stream)) => Ok(stream),
            Ok(Err(e)) => Err(Error::Io(e)),
            Err(_) => Err(Error::ConnectTimeout(self.socket_path.clone())),
        }
    }

    async fn send_line(mut stream: UnixStream, url: &str) -> Result<()> {
        stream.write_all(url.as_bytes()).await?;
        stream.write_all(b"\n").await?;
        stream.flush().await?;
        stream.shutdown().await?;
        tracing::debug!("Delivered URL: {}", url);
        Ok(())
    }
}
