//! Provisioning orchestration.
//!
//! This module provides the [`Provisioner`], which turns [`Settings`] into a
//! runnable executable in the cache: first run downloads and extracts, every
//! later run is a cache hit.

use super::{
    cache::CacheLocation,
    error::Result,
    fetch::{Fetcher, build_client},
    lock::CacheLock,
    release::DownloadDescriptor,
};
use crate::config::Settings;
use std::path::{Path, PathBuf};

/// Ensures the ws4sql executable is present in the cache.
///
/// # Examples
///
/// ```no_run
/// use ws4sql_launcher::{config::SettingsBuilder, provisioner::Provisioner};
///
/// # async fn example() -> ws4sql_launcher::provisioner::Result<()> {
/// let provisioner = Provisioner::new(SettingsBuilder::new().build()?)?;
/// let path = provisioner.ensure_executable().await?;
/// println!("ws4sql ready at {}", path.display());
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct Provisioner {
    settings: Settings,
    location: CacheLocation,
    fetcher: Fetcher,
}

impl Provisioner {
    /// Creates a provisioner. Does not touch the network or filesystem.
    pub fn new(settings: Settings) -> Result<Self> {
        let client = build_client(settings.allow_insecure_http())?;
        let fetcher = Fetcher::new(
            client,
            settings.max_redirects(),
            settings.expected_sha256().map(str::to_string),
        );
        let location = settings.cache_location();
        Ok(Self {
            settings,
            location,
            fetcher,
        })
    }

    /// Settings this provisioner was built from.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Where the executable lives once provisioned.
    pub fn executable_path(&self) -> &Path {
        self.location.executable_path()
    }

    /// Cache layout in use.
    pub fn location(&self) -> &CacheLocation {
        &self.location
    }

    /// URL the release archive is downloaded from.
    pub fn download_descriptor(&self) -> Result<DownloadDescriptor> {
        DownloadDescriptor::new(
            self.settings.base_url(),
            self.settings.version(),
            self.settings.platform(),
        )
    }

    /// Downloads and extracts the executable unless it is already cached.
    ///
    /// # Process
    ///
    /// 1. Create the cache directory
    /// 2. Return early when the cached executable is usable
    /// 3. Take the cache lock and check again (another launcher may have
    ///    finished provisioning while we waited)
    /// 4. Download the archive, extract the executable, record its checksum
    ///
    /// # Returns
    ///
    /// Path of the cached executable.
    pub async fn ensure_executable(&self) -> Result<PathBuf> {
        let verify = self.settings.verify_cache();
        self.location.ensure_dir().await?;

        if self.location.is_provisioned(verify).await? {
            log::debug!(
                "ws4sql already provisioned at {}",
                self.executable_path().display()
            );
            return Ok(self.executable_path().to_path_buf());
        }

        let _lock = CacheLock::acquire(&self.location.lock_path()).await?;

        if self.location.is_provisioned(verify).await? {
            log::debug!("ws4sql was provisioned by another process while waiting for the lock");
            return Ok(self.executable_path().to_path_buf());
        }
        self.location.clear().await?;

        log::info!("Downloading and extracting ws4sql executable...");
        let descriptor = self.download_descriptor()?;
        log::debug!("Release archive for {}: {}", self.settings.platform(), descriptor);

        let path = self
            .fetcher
            .fetch_and_extract(&descriptor, &self.location)
            .await?;
        let digest = self.location.record_checksum().await?;
        log::debug!("Recorded sha256 {} for {}", digest, path.display());

        log::info!("ws4sql executable downloaded and extracted successfully.");
        Ok(path)
    }
}
