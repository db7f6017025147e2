//! Exclusive lock around first-run provisioning.
//!
//! Two launchers starting at the same time on a fresh machine would
//! otherwise download into the same cache directory. On Unix the lock is an
//! advisory `flock` held for the lifetime of [`CacheLock`]. Elsewhere the
//! atomic rename of the extracted executable is the only guard.

use super::error::{Error, ErrorExt, Result};
use std::path::{Path, PathBuf};

/// Held exclusive lock on the cache directory. Released on drop.
#[derive(Debug)]
pub struct CacheLock {
    path: PathBuf,
    #[cfg(unix)]
    _guard: nix::fcntl::Flock<std::fs::File>,
}

impl CacheLock {
    /// Blocks (off the async executor) until the lock at `path` is acquired.
    pub async fn acquire(path: &Path) -> Result<Self> {
        let path = path.to_path_buf();
        log::debug!("Acquiring cache lock {}", path.display());

        tokio::task::spawn_blocking(move || Self::acquire_blocking(path))
            .await
            .map_err(|e| Error::GenericError(format!("Cache lock task panicked: {e}")))?
    }

    #[cfg(unix)]
    fn acquire_blocking(path: PathBuf) -> Result<Self> {
        use nix::fcntl::{Flock, FlockArg};

        let file = std::fs::OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&path)
            .fs_context("opening cache lock file", &path)?;

        let guard = Flock::lock(file, FlockArg::LockExclusive).map_err(|(_, errno)| Error::Lock {
            path: path.clone(),
            reason: errno.to_string(),
        })?;

        Ok(Self {
            path,
            _guard: guard,
        })
    }

    #[cfg(not(unix))]
    fn acquire_blocking(path: PathBuf) -> Result<Self> {
        std::fs::OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&path)
            .fs_context("opening cache lock file", &path)?;
        Ok(Self { path })
    }

    /// Path of the lock file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for CacheLock {
    fn drop(&mut self) {
        log::debug!("Releasing cache lock {}", self.path.display());
    }
}
