//! TOML configuration file.

use crate::error::{LauncherError, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// File name looked up in `<OS config dir>/ws4sql/`.
pub const CONFIG_FILE_NAME: &str = "launcher.toml";

/// Launcher settings as written in a TOML file. Every key is optional.
///
/// ```toml
/// version = "0.17dev2"
/// base_url = "https://github.com/proofrock/ws4sqlite/releases/download"
/// cache_dir = "/var/cache/ws4sql"
/// sha256 = "..."
/// max_redirects = 5
/// verify_cache = true
/// allow_insecure_http = false
/// ```
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    /// ws4sql release version, with or without a leading `v`.
    pub version: Option<String>,
    /// Release host root the versioned archive path is appended to.
    pub base_url: Option<String>,
    /// Cache root directory.
    pub cache_dir: Option<PathBuf>,
    /// Expected hex SHA-256 of the release archive.
    pub sha256: Option<String>,
    /// Redirect hops followed before failing.
    pub max_redirects: Option<usize>,
    /// Check the cached executable against its recorded checksum before use.
    pub verify_cache: Option<bool>,
    /// Permit plain `http://` downloads.
    pub allow_insecure_http: Option<bool>,
}

impl FileConfig {
    /// Parses a config from TOML text.
    pub fn parse(contents: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    /// Reads and parses the config file at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| LauncherError::Config {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Self::parse(&contents).map_err(|e| LauncherError::Config {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// `<OS config dir>/ws4sql/launcher.toml`, if the OS has a config dir.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| {
            dir.join(crate::provisioner::CACHE_NAMESPACE)
                .join(CONFIG_FILE_NAME)
        })
    }

    /// Loads `path` when given, otherwise the default file when it exists.
    pub fn discover(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::load(path);
        }
        match Self::default_path() {
            Some(path) if path.is_file() => {
                log::debug!("Loading launcher config from {}", path.display());
                Self::load(&path)
            }
            _ => Ok(Self::default()),
        }
    }
}
