//! Error types for executable provisioning.
//!
//! Every failure between "which platform are we on" and "the executable is
//! sitting in the cache" is reported through [`Error`].

use std::{
    io,
    path::{Path, PathBuf},
};
use thiserror::Error as ThisError;

/// Result type for provisioning operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while provisioning the ws4sql executable.
#[derive(ThisError, Debug)]
#[non_exhaustive]
pub enum Error {
    /// The host operating system has no ws4sql release.
    #[error("Unsupported platform: {0}")]
    UnsupportedPlatform(String),

    /// The host CPU architecture has no ws4sql release.
    #[error("Unsupported architecture: {0}")]
    UnsupportedArchitecture(String),

    /// A download URL could not be built or resolved.
    #[error("Invalid URL `{url}`: {reason}")]
    InvalidUrl {
        /// The offending URL or URL fragment
        url: String,
        /// Parser message
        reason: String,
    },

    /// Transport-level failure talking to the release host.
    #[error("Network error: {0}")]
    Network(String),

    /// The release host answered with a non-success status.
    #[error("Download of {url} failed with HTTP {status}")]
    HttpStatus {
        /// Requested URL
        url: String,
        /// Final HTTP status code
        status: u16,
    },

    /// The redirect chain exceeded the configured limit.
    #[error("Too many redirects ({limit}) while downloading {url}")]
    TooManyRedirects {
        /// URL of the original request
        url: String,
        /// Maximum number of hops allowed
        limit: usize,
    },

    /// The downloaded archive could not be parsed.
    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    /// The archive did not contain the expected executable.
    #[error("`{name}` not found in archive downloaded from {url}")]
    ExecutableNotFound {
        /// Expected executable file name
        name: String,
        /// Archive URL
        url: String,
    },

    /// The downloaded archive does not match the pinned digest.
    #[error("Checksum mismatch for {url}: expected {expected}, got {actual}")]
    ChecksumMismatch {
        /// Archive URL
        url: String,
        /// Configured SHA-256
        expected: String,
        /// Computed SHA-256
        actual: String,
    },

    /// No OS cache directory could be determined for this user.
    #[error("Could not determine a cache directory for the current user")]
    NoCacheDir,

    /// Filesystem operation failed on a known path.
    #[error("{context} ({path}): {source}")]
    Filesystem {
        /// What was being attempted
        context: String,
        /// Path involved
        path: PathBuf,
        /// Underlying error
        #[source]
        source: io::Error,
    },

    /// Acquiring the cache lock failed.
    #[error("Failed to lock {path}: {reason}")]
    Lock {
        /// Lock file path
        path: PathBuf,
        /// OS-level reason
        reason: String,
    },

    /// Anything else.
    #[error("{0}")]
    GenericError(String),
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::Network(e.to_string())
    }
}

/// Attaches a description and path to IO failures.
pub trait ErrorExt<T> {
    /// Converts an IO error into [`Error::Filesystem`].
    fn fs_context(self, context: &str, path: impl AsRef<Path>) -> Result<T>;
}

impl<T> ErrorExt<T> for std::result::Result<T, io::Error> {
    fn fs_context(self, context: &str, path: impl AsRef<Path>) -> Result<T> {
        self.map_err(|source| Error::Filesystem {
            context: context.to_string(),
            path: path.as_ref().to_path_buf(),
            source,
        })
    }
}

/// Returns early with an [`Error::GenericError`] built from a format string.
#[macro_export]
macro_rules! bail {
    ($($arg:tt)*) => {
        return Err($crate::provisioner::Error::GenericError(format!($($arg)*)))
    };
}
