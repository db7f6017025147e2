//! Release archive URL construction.

use super::{
    error::{Error, Result},
    platform::Platform,
};
use std::fmt;
use url::Url;

/// Release host root that versioned ws4sql releases live under.
pub const DEFAULT_BASE_URL: &str = "https://github.com/proofrock/ws4sqlite/releases/download";

/// Fully-qualified location of a release archive.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DownloadDescriptor {
    url: Url,
}

impl DownloadDescriptor {
    /// Builds the archive URL for `version` on `platform`.
    ///
    /// Layout: `<base>/ws4sql_v<VERSION>/ws4sql-v<VERSION>-<os>-<arch>.zip`.
    ///
    /// ```
    /// use ws4sql_launcher::provisioner::{Arch, DownloadDescriptor, Os, Platform, DEFAULT_BASE_URL};
    ///
    /// let descriptor = DownloadDescriptor::new(
    ///     DEFAULT_BASE_URL,
    ///     "0.17dev2",
    ///     Platform::new(Os::Darwin, Arch::Arm64),
    /// )
    /// .unwrap();
    /// assert_eq!(
    ///     descriptor.as_str(),
    ///     "https://github.com/proofrock/ws4sqlite/releases/download/ws4sql_v0.17dev2/ws4sql-v0.17dev2-darwin-arm64.zip"
    /// );
    /// ```
    pub fn new(base_url: &str, version: &str, platform: Platform) -> Result<Self> {
        let raw = format!(
            "{}/ws4sql_v{version}/{}",
            base_url.trim_end_matches('/'),
            Self::asset_name(version, platform)
        );
        let url = Url::parse(&raw).map_err(|e| Error::InvalidUrl {
            url: raw.clone(),
            reason: e.to_string(),
        })?;
        Ok(Self { url })
    }

    /// Archive file name published for `version` on `platform`.
    pub fn asset_name(version: &str, platform: Platform) -> String {
        format!("ws4sql-v{version}-{}-{}.zip", platform.os, platform.arch)
    }

    /// The URL as a string.
    pub fn as_str(&self) -> &str {
        self.url.as_str()
    }

    /// The parsed URL.
    pub fn url(&self) -> &Url {
        &self.url
    }
}

impl fmt::Display for DownloadDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.url.as_str())
    }
}
