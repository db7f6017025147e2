//! Builder for constructing Settings.

use super::{DEFAULT_VERSION, FileConfig, Settings};
use crate::provisioner::{
    DEFAULT_BASE_URL, DEFAULT_MAX_REDIRECTS, Error, Platform, Result, checksum, default_cache_root,
};
use std::path::{Path, PathBuf};

/// Builder for constructing [`Settings`].
///
/// Every setter overrides whatever was set before it, so callers apply
/// sources from lowest to highest precedence.
///
/// # Examples
///
/// ```no_run
/// use ws4sql_launcher::config::{FileConfig, SettingsBuilder};
///
/// # fn example(file: FileConfig) -> ws4sql_launcher::provisioner::Result<()> {
/// let settings = SettingsBuilder::new()
///     .apply_file(&file)
///     .max_redirects(3)
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct SettingsBuilder {
    version: Option<String>,
    base_url: Option<String>,
    cache_root: Option<PathBuf>,
    platform: Option<Platform>,
    expected_sha256: Option<String>,
    max_redirects: Option<usize>,
    verify_cache: Option<bool>,
    allow_insecure_http: Option<bool>,
}

impl SettingsBuilder {
    /// Creates a new settings builder.
    pub fn new() -> Self {
        Default::default()
    }

    /// Copies every value present in a config file.
    pub fn apply_file(mut self, file: &FileConfig) -> Self {
        if let Some(version) = &file.version {
            self.version = Some(version.clone());
        }
        if let Some(base_url) = &file.base_url {
            self.base_url = Some(base_url.clone());
        }
        if let Some(cache_dir) = &file.cache_dir {
            self.cache_root = Some(cache_dir.clone());
        }
        if let Some(sha256) = &file.sha256 {
            self.expected_sha256 = Some(sha256.clone());
        }
        if let Some(max_redirects) = file.max_redirects {
            self.max_redirects = Some(max_redirects);
        }
        if let Some(verify_cache) = file.verify_cache {
            self.verify_cache = Some(verify_cache);
        }
        if let Some(allow) = file.allow_insecure_http {
            self.allow_insecure_http = Some(allow);
        }
        self
    }

    /// Sets the ws4sql release version.
    ///
    /// Default: [`DEFAULT_VERSION`]
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Sets the release host root.
    ///
    /// Default: [`DEFAULT_BASE_URL`]
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Sets the cache root directory.
    ///
    /// Default: `<OS cache dir>/ws4sql`
    pub fn cache_root<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.cache_root = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets the platform to download for.
    ///
    /// Default: detected from the running host
    pub fn platform(mut self, platform: Platform) -> Self {
        self.platform = Some(platform);
        self
    }

    /// Pins the SHA-256 of the release archive.
    pub fn expected_sha256(mut self, digest: impl Into<String>) -> Self {
        self.expected_sha256 = Some(digest.into());
        self
    }

    /// Sets the redirect limit.
    ///
    /// Default: [`DEFAULT_MAX_REDIRECTS`]
    pub fn max_redirects(mut self, max_redirects: usize) -> Self {
        self.max_redirects = Some(max_redirects);
        self
    }

    /// Enables or disables checksum verification of the cached executable.
    ///
    /// Default: enabled
    pub fn verify_cache(mut self, verify: bool) -> Self {
        self.verify_cache = Some(verify);
        self
    }

    /// Allows plain `http://` downloads.
    ///
    /// Default: disabled
    pub fn allow_insecure_http(mut self, allow: bool) -> Self {
        self.allow_insecure_http = Some(allow);
        self
    }

    /// Builds the settings.
    ///
    /// # Errors
    ///
    /// - the host platform is unsupported and none was set explicitly
    /// - no cache root was set and the OS has no cache directory
    /// - the version is empty or contains anything but ASCII letters, digits, `.`, `_` or `-`
    /// - the base URL does not parse
    /// - the pinned digest is not 64 hex characters
    pub fn build(self) -> Result<Settings> {
        let platform = match self.platform {
            Some(platform) => platform,
            None => Platform::detect()?,
        };

        let version = self.version.unwrap_or_else(|| DEFAULT_VERSION.to_string());
        let version = version.trim().trim_start_matches('v').to_string();
        let url_safe = |c: char| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-');
        if version.is_empty() || !version.chars().all(url_safe) {
            crate::bail!("Invalid ws4sql version `{version}`");
        }

        let base_url = self
            .base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        url::Url::parse(&base_url).map_err(|e| Error::InvalidUrl {
            url: base_url.clone(),
            reason: e.to_string(),
        })?;

        let cache_root = match self.cache_root {
            Some(root) => root,
            None => default_cache_root()?,
        };

        let expected_sha256 = self
            .expected_sha256
            .as_deref()
            .map(checksum::normalize_digest)
            .transpose()?;

        Ok(Settings {
            version,
            base_url,
            cache_root,
            platform,
            expected_sha256,
            max_redirects: self.max_redirects.unwrap_or(DEFAULT_MAX_REDIRECTS),
            verify_cache: self.verify_cache.unwrap_or(true),
            allow_insecure_http: self.allow_insecure_http.unwrap_or(false),
        })
    }
}
