//! Executable provisioning.
//!
//! Resolves the host platform, builds the release URL, downloads the
//! archive and installs the ws4sql executable into a per-user cache.
//!
//! # Module Organization
//!
//! - `platform` - host OS / CPU architecture resolution
//! - `release` - release archive URL construction
//! - `cache` - cache directory layout and integrity checks
//! - `fetch` - HTTPS download with bounded redirects
//! - `extract` - archive scanning and atomic install
//! - `lock` - exclusive lock around first-run provisioning
//! - `checksum` - SHA-256 helpers
//! - `orchestrator` - the [`Provisioner`] tying it together

mod cache;
pub mod checksum;
mod error;
mod extract;
mod fetch;
mod lock;
mod orchestrator;
mod platform;
mod release;

pub use cache::{CACHE_NAMESPACE, CacheLocation, default_cache_root};
pub use error::{Error, ErrorExt, Result};
pub use extract::extract_executable;
pub use fetch::{DEFAULT_MAX_REDIRECTS, DownloadedArchive, Fetcher, build_client};
pub use lock::CacheLock;
pub use orchestrator::Provisioner;
pub use platform::{Arch, Os, Platform};
pub use release::{DEFAULT_BASE_URL, DownloadDescriptor};
