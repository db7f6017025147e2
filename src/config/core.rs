//! Core Settings struct.

use crate::provisioner::{CacheLocation, Platform};
use std::path::{Path, PathBuf};

/// ws4sql release downloaded when no version is configured.
pub const DEFAULT_VERSION: &str = "0.17dev2";

/// Resolved launcher configuration.
///
/// Constructed via [`SettingsBuilder`](super::SettingsBuilder); every field
/// has been validated by the time a `Settings` exists.
///
/// # Examples
///
/// ```no_run
/// use ws4sql_launcher::config::SettingsBuilder;
///
/// # fn example() -> ws4sql_launcher::provisioner::Result<()> {
/// let settings = SettingsBuilder::new()
///     .cache_root("/tmp/ws4sql-cache")
///     .version("0.17dev2")
///     .build()?;
/// println!("{}", settings.cache_location().executable_path().display());
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct Settings {
    /// ws4sql release version (without the leading `v`).
    pub(super) version: String,

    /// Release host root the versioned archive path is appended to.
    pub(super) base_url: String,

    /// Root under which version directories are created.
    pub(super) cache_root: PathBuf,

    /// Platform whose release is downloaded.
    pub(super) platform: Platform,

    /// Pinned lowercase hex SHA-256 of the release archive.
    pub(super) expected_sha256: Option<String>,

    /// Redirect hops followed before failing.
    pub(super) max_redirects: usize,

    /// Check the cached executable against its recorded checksum before use.
    pub(super) verify_cache: bool,

    /// Permit plain `http://` downloads.
    pub(super) allow_insecure_http: bool,
}

impl Settings {
    /// ws4sql release version.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Release host root.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Cache root directory.
    pub fn cache_root(&self) -> &Path {
        &self.cache_root
    }

    /// Target platform.
    pub fn platform(&self) -> Platform {
        self.platform
    }

    /// Pinned archive digest, if any.
    pub fn expected_sha256(&self) -> Option<&str> {
        self.expected_sha256.as_deref()
    }

    /// Redirect limit.
    pub fn max_redirects(&self) -> usize {
        self.max_redirects
    }

    /// Whether cached executables are checksum-verified.
    pub fn verify_cache(&self) -> bool {
        self.verify_cache
    }

    /// Whether plain HTTP downloads are allowed.
    pub fn allow_insecure_http(&self) -> bool {
        self.allow_insecure_http
    }

    /// Cache layout for the configured version and platform.
    pub fn cache_location(&self) -> CacheLocation {
        CacheLocation::new(&self.cache_root, &self.version, self.platform)
    }
}
