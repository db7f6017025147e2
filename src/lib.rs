//! Launcher for the prebuilt ws4sql SQLite-over-HTTP server.
//!
//! This library downloads the platform-specific ws4sql release on first
//! use, caches the executable per user and version, and runs it as a child
//! process, relaying its output and exit code:
//! - [`provisioner`] - platform resolution, download, extraction, caching
//! - [`launcher`] - process spawning and exit code mapping
//! - [`config`] - settings, builder and TOML config file
//!
//! It can be used both as a CLI tool and as a library dependency.

pub mod cli;
pub mod config;
pub mod error;
pub mod launcher;
pub mod provisioner;

// Re-export commonly used types
pub use config::{Settings, SettingsBuilder};
pub use error::{LauncherError, Result};
pub use launcher::Launcher;
pub use provisioner::Provisioner;

use std::{ffi::OsStr, path::PathBuf};

/// Runs ws4sql with `args` using default settings, downloading it first if needed.
///
/// Resolves when ws4sql exits with code 0; any other code is returned as
/// [`LauncherError::NonZeroExit`].
pub async fn run_ws4sql<I, S>(args: I) -> Result<()>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    Launcher::new(SettingsBuilder::new().build()?)?
        .run(args)
        .await
}

/// Path of the cached ws4sql executable under default settings.
pub fn executable_path() -> Result<PathBuf> {
    let settings = SettingsBuilder::new().build()?;
    Ok(settings.cache_location().executable_path().to_path_buf())
}
