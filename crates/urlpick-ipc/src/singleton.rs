use crate::{Error, Result};
use fs2::FileExt;
use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

/// Machine-wide single-instance guard backed by an exclusive file lock.
///
/// Held for the process lifetime; dropping the guard unlocks and
/// best-effort removes the lock file.
#[derive(Debug)]
pub struct SingletonGuard {
    file: File,
    path: PathBuf,
}

impl SingletonGuard {
    /// Try to become the single instance.
    ///
    /// `Ok(Some(guard))` means this process now holds the lock. `Ok(None)`
    /// means another instance already holds it; the caller must exit
    /// without further side effects. Any other failure is an error and
    /// fatal at startup.
    pub fn try_acquire(path: &Path) -> Result<Option<SingletonGuard>> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .open(path)?;

        match file.try_lock_exclusive() {
            Ok(()) => {
                tracing::debug!("Acquired instance lock: {}", path.display());
                Ok(Some(SingletonGuard {
                    file,
                    path: path.to_path_buf(),
                }))
            }
            Err(e) if e.kind() == io::ErrorKind::WouldBlock => {
                tracing::debug!("Instance lock already held: {}", path.display());
                Ok(None)
            }
            Err(e) => Err(Error::Io(e)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for SingletonGuard {
    fn drop(&mut self) {
        // Best-effort unlock and cleanup; ignore errors
        let _ = FileExt::unlock(&self.file);
        let _ = fs::remove_file(&self.path);
    }
}
