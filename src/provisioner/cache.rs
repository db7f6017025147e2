//! Per-user cache directory layout.
//!
//! The executable for a given version lives in its own directory:
//!
//! ```text
//! <cache root>/ws4sql/v<VERSION>/
//! ├── ws4sql            executable (ws4sql.exe on Windows)
//! ├── ws4sql.sha256     digest recorded after extraction
//! └── .ws4sql.lock      provisioning lock
//! ```

use super::{
    checksum,
    error::{Error, ErrorExt, Result},
    platform::Platform,
};
use std::{
    io,
    path::{Path, PathBuf},
};
use tokio::fs;

/// Directory name under the OS cache root.
pub const CACHE_NAMESPACE: &str = "ws4sql";

const LOCK_FILE_NAME: &str = ".ws4sql.lock";

/// Returns the default cache root (`<OS cache dir>/ws4sql`).
pub fn default_cache_root() -> Result<PathBuf> {
    dirs::cache_dir()
        .map(|dir| dir.join(CACHE_NAMESPACE))
        .ok_or(Error::NoCacheDir)
}

/// Where the executable for one version and platform is cached.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CacheLocation {
    dir: PathBuf,
    executable: PathBuf,
}

impl CacheLocation {
    /// Lays out the cache for `version` under `root`.
    pub fn new(root: &Path, version: &str, platform: Platform) -> Self {
        let dir = root.join(format!("v{version}"));
        let executable = dir.join(platform.executable_name());
        Self { dir, executable }
    }

    /// Version-scoped cache directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path the executable must live at.
    pub fn executable_path(&self) -> &Path {
        &self.executable
    }

    /// File name of the executable.
    pub fn executable_name(&self) -> &str {
        self.executable
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or_default()
    }

    /// Sidecar holding the hex SHA-256 of the executable.
    pub fn checksum_path(&self) -> PathBuf {
        let mut name = self.executable.as_os_str().to_os_string();
        name.push(".sha256");
        PathBuf::from(name)
    }

    /// Advisory lock file serializing first-run provisioning.
    pub fn lock_path(&self) -> PathBuf {
        self.dir.join(LOCK_FILE_NAME)
    }

    /// Creates the cache directory and its parents. Idempotent.
    pub async fn ensure_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .await
            .fs_context("creating cache directory", &self.dir)
    }

    /// Whether the executable file exists.
    pub async fn executable_exists(&self) -> Result<bool> {
        fs::try_exists(&self.executable)
            .await
            .fs_context("checking cached executable", &self.executable)
    }

    /// Whether the cached executable can be used as-is.
    ///
    /// Without `verify`, presence of the file is enough. With `verify`, the
    /// checksum sidecar must exist and match the executable's content.
    pub async fn is_provisioned(&self, verify: bool) -> Result<bool> {
        if !self.executable_exists().await? {
            return Ok(false);
        }
        if !verify {
            return Ok(true);
        }

        let checksum_path = self.checksum_path();
        let recorded = match fs::read_to_string(&checksum_path).await {
            Ok(contents) => contents.trim().to_ascii_lowercase(),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::warn!(
                    "No checksum recorded for {}; it will be downloaded again",
                    self.executable.display()
                );
                return Ok(false);
            }
            Err(e) => return Err(e).fs_context("reading checksum file", &checksum_path),
        };

        let actual = checksum::file_sha256(&self.executable).await?;
        if actual != recorded {
            log::warn!(
                "Cached executable {} does not match its recorded checksum; it will be downloaded again",
                self.executable.display()
            );
            return Ok(false);
        }
        Ok(true)
    }

    /// Writes the checksum sidecar for the current executable.
    pub async fn record_checksum(&self) -> Result<String> {
        let digest = checksum::file_sha256(&self.executable).await?;
        let path = self.checksum_path();
        fs::write(&path, format!("{digest}\n"))
            .await
            .fs_context("writing checksum file", &path)?;
        Ok(digest)
    }

    /// Removes the executable and its sidecar, ignoring files that are already gone.
    pub async fn clear(&self) -> Result<()> {
        for path in [self.executable.clone(), self.checksum_path()] {
            match fs::remove_file(&path).await {
                Ok(()) => {}
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => return Err(e).fs_context("removing stale cache file", &path),
            }
        }
        Ok(())
    }
}
