//! Host platform and CPU architecture resolution.

use super::error::{Error, Result};
use std::fmt;

/// Operating systems ws4sql publishes releases for.
///
/// The [`Display`](fmt::Display) form is the identifier used in release
/// asset names.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Os {
    /// macOS
    Darwin,
    /// Windows
    Windows,
    /// Linux
    Linux,
}

impl Os {
    /// Maps a Rust OS name (`std::env::consts::OS`) to a release OS.
    pub fn from_host(os: &str) -> Result<Self> {
        match os {
            "macos" => Ok(Os::Darwin),
            "windows" => Ok(Os::Windows),
            "linux" => Ok(Os::Linux),
            other => Err(Error::UnsupportedPlatform(other.to_string())),
        }
    }

    /// Release asset identifier.
    pub fn as_str(self) -> &'static str {
        match self {
            Os::Darwin => "darwin",
            Os::Windows => "windows",
            Os::Linux => "linux",
        }
    }

    /// File name of the ws4sql executable inside release archives.
    pub fn executable_name(self) -> &'static str {
        match self {
            Os::Windows => "ws4sql.exe",
            Os::Darwin | Os::Linux => "ws4sql",
        }
    }
}

impl fmt::Display for Os {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// CPU architectures ws4sql publishes releases for.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Arch {
    /// x86_64 / AMD64 (64-bit)
    Amd64,
    /// AArch64 / ARM64 (64-bit)
    Arm64,
}

impl Arch {
    /// Maps a Rust architecture name (`std::env::consts::ARCH`) to a release architecture.
    pub fn from_host(arch: &str) -> Result<Self> {
        match arch {
            "x86_64" => Ok(Arch::Amd64),
            "aarch64" => Ok(Arch::Arm64),
            other => Err(Error::UnsupportedArchitecture(other.to_string())),
        }
    }

    /// Release asset identifier.
    pub fn as_str(self) -> &'static str {
        match self {
            Arch::Amd64 => "amd64",
            Arch::Arm64 => "arm64",
        }
    }
}

impl fmt::Display for Arch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolved (OS, architecture) pair used to pick a release asset.
///
/// # Examples
///
/// ```
/// use ws4sql_launcher::provisioner::{Arch, Os, Platform};
///
/// let platform = Platform::from_host("macos", "aarch64").unwrap();
/// assert_eq!(platform, Platform::new(Os::Darwin, Arch::Arm64));
/// assert_eq!(platform.to_string(), "darwin-arm64");
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct Platform {
    /// Operating system
    pub os: Os,
    /// CPU architecture
    pub arch: Arch,
}

impl Platform {
    /// Creates a platform from already-resolved parts.
    pub fn new(os: Os, arch: Arch) -> Self {
        Self { os, arch }
    }

    /// Resolves a platform from Rust's host OS and architecture names.
    ///
    /// The OS is checked first, so a host that is wrong on both counts
    /// reports [`Error::UnsupportedPlatform`].
    pub fn from_host(os: &str, arch: &str) -> Result<Self> {
        Ok(Self {
            os: Os::from_host(os)?,
            arch: Arch::from_host(arch)?,
        })
    }

    /// Resolves the platform this process is running on.
    pub fn detect() -> Result<Self> {
        let platform = Self::from_host(std::env::consts::OS, std::env::consts::ARCH)?;
        log::debug!("Detected platform {}", platform);
        Ok(platform)
    }

    /// File name of the ws4sql executable for this platform.
    pub fn executable_name(&self) -> &'static str {
        self.os.executable_name()
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.os, self.arch)
    }
}
