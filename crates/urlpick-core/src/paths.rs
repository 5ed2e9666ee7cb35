use std::env;
use std::path::PathBuf;

/// Process/binary name of the background service
#[cfg(not(windows))]
pub const SERVICE_BINARY: &str = "urlpickd";
#[cfg(windows)]
pub const SERVICE_BINARY: &str = "urlpickd.exe";

const SOCKET_FILE: &str = "urlpick.sock";
const LOCK_FILE: &str = "urlpickd.lock";

/// Directory for the socket and lock file: the user runtime dir when the
/// platform has one, the system temp dir otherwise
fn runtime_dir() -> PathBuf {
    dirs::runtime_dir().unwrap_or_else(env::temp_dir)
}

/// Default path of the inbound IPC socket
pub fn default_socket_path() -> PathBuf {
    runtime_dir().join(SOCKET_FILE)
}

/// Default path of the singleton lock file
pub fn default_lock_path() -> PathBuf {
    runtime_dir().join(LOCK_FILE)
}

/// Default path of the persisted inventory document
pub fn default_settings_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(env::temp_dir)
        .join("urlpick")
        .join("settings.json")
}
