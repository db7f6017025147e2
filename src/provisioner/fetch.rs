//! Release archive download.
//!
//! Redirects are followed by hand so the number of hops stays bounded and
//! every hop shows up in the debug log.

use super::{
    cache::CacheLocation,
    error::{Error, ErrorExt, Result},
    extract,
    release::DownloadDescriptor,
};
use reqwest::{Client, header::LOCATION, redirect::Policy};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tokio::io::AsyncWriteExt;
use url::Url;

/// Redirect hops followed before giving up.
pub const DEFAULT_MAX_REDIRECTS: usize = 5;

/// Builds the HTTP client used for release downloads.
///
/// Automatic redirects are disabled; [`Fetcher`] follows them itself.
/// Unless `allow_insecure_http` is set, plain `http://` URLs are refused.
pub fn build_client(allow_insecure_http: bool) -> Result<Client> {
    Client::builder()
        .user_agent(concat!("ws4sql-launcher/", env!("CARGO_PKG_VERSION")))
        .redirect(Policy::none())
        .https_only(!allow_insecure_http)
        .build()
        .map_err(|e| Error::Network(format!("Failed to create HTTP client: {e}")))
}

/// An archive downloaded to a temporary file. The file is deleted on drop.
#[derive(Debug)]
pub struct DownloadedArchive {
    file: NamedTempFile,
    /// URL the body was finally served from
    pub final_url: Url,
    /// Hex SHA-256 of the body
    pub sha256: String,
    /// Body size in bytes
    pub size: u64,
}

impl DownloadedArchive {
    /// Location of the temporary archive.
    pub fn path(&self) -> &Path {
        self.file.path()
    }
}

/// Downloads release archives and extracts the executable from them.
#[derive(Clone, Debug)]
pub struct Fetcher {
    client: Client,
    max_redirects: usize,
    expected_sha256: Option<String>,
}

impl Fetcher {
    /// Creates a fetcher.
    ///
    /// `expected_sha256`, when set, pins the archive digest.
    pub fn new(client: Client, max_redirects: usize, expected_sha256: Option<String>) -> Self {
        Self {
            client,
            max_redirects,
            expected_sha256,
        }
    }

    /// Downloads the archive at `descriptor` and installs its executable into `location`.
    pub async fn fetch_and_extract(
        &self,
        descriptor: &DownloadDescriptor,
        location: &CacheLocation,
    ) -> Result<PathBuf> {
        let archive = self.download(descriptor.url(), location.dir()).await?;
        log::debug!(
            "Downloaded {} bytes from {} (sha256 {})",
            archive.size,
            archive.final_url,
            archive.sha256
        );

        if let Some(expected) = &self.expected_sha256 {
            if *expected != archive.sha256 {
                return Err(Error::ChecksumMismatch {
                    url: descriptor.to_string(),
                    expected: expected.clone(),
                    actual: archive.sha256.clone(),
                });
            }
        }

        let reader = archive
            .file
            .reopen()
            .fs_context("reopening downloaded archive", archive.path())?;
        extract::extract_executable(reader, location, descriptor.as_str()).await
    }

    /// Streams the body at `url` into a temporary file inside `dir`,
    /// following up to `max_redirects` redirects.
    pub async fn download(&self, url: &Url, dir: &Path) -> Result<DownloadedArchive> {
        let mut current = url.clone();
        let mut hops = 0;

        let mut response = loop {
            log::debug!("GET {}", current);
            let response = self.client.get(current.clone()).send().await?;
            let status = response.status();

            if status.is_redirection() {
                if hops >= self.max_redirects {
                    return Err(Error::TooManyRedirects {
                        url: url.to_string(),
                        limit: self.max_redirects,
                    });
                }
                let location = response
                    .headers()
                    .get(LOCATION)
                    .ok_or_else(|| {
                        Error::Network(format!(
                            "HTTP {} from {} without a Location header",
                            status.as_u16(),
                            current
                        ))
                    })?
                    .to_str()
                    .map_err(|e| Error::Network(format!("Unreadable Location header: {e}")))?;
                let next = current.join(location).map_err(|e| Error::InvalidUrl {
                    url: location.to_string(),
                    reason: e.to_string(),
                })?;

                log::debug!("HTTP {} redirect to {}", status.as_u16(), next);
                current = next;
                hops += 1;
                continue;
            }

            if !status.is_success() {
                return Err(Error::HttpStatus {
                    url: current.to_string(),
                    status: status.as_u16(),
                });
            }
            break response;
        };

        let temp = tempfile::Builder::new()
            .prefix(".ws4sql-download-")
            .suffix(".zip")
            .tempfile_in(dir)
            .fs_context("creating temporary archive", dir)?;
        let writer = temp
            .as_file()
            .try_clone()
            .fs_context("opening temporary archive", temp.path())?;
        let mut writer = tokio::fs::File::from_std(writer);

        let mut hasher = Sha256::new();
        let mut size = 0u64;
        while let Some(chunk) = response.chunk().await? {
            hasher.update(&chunk);
            writer
                .write_all(&chunk)
                .await
                .fs_context("writing downloaded archive", temp.path())?;
            size += chunk.len() as u64;
        }
        writer
            .flush()
            .await
            .fs_context("flushing downloaded archive", temp.path())?;

        Ok(DownloadedArchive {
            file: temp,
            final_url: current,
            sha256: hex::encode(hasher.finalize()),
            size,
        })
    }
}
