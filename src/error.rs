//! Top-level error types for the launcher.
//!
//! A failed `run` is either a provisioning failure (nothing was spawned) or
//! the launched ws4sql process ending unsuccessfully. [`LauncherError`]
//! keeps the two apart so callers can tell which happened.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for launcher operations
pub type Result<T> = std::result::Result<T, LauncherError>;

/// Main error type for all launcher operations
#[derive(Error, Debug)]
pub enum LauncherError {
    /// Provisioning the executable failed; nothing was spawned
    #[error("Provisioning failed: {0}")]
    Provision(#[from] crate::provisioner::Error),

    /// The config file could not be read or parsed
    #[error("Invalid config file {path}: {reason}")]
    Config {
        /// Config file path
        path: PathBuf,
        /// Reason for the error
        reason: String,
    },

    /// The executable could not be started
    #[error("Failed to start {path}: {source}")]
    Spawn {
        /// Executable path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// IO errors while relaying the child's output or waiting on it
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// ws4sql exited with a non-zero code
    #[error("ws4sql exited with code {code}")]
    NonZeroExit {
        /// Exit code reported by the child
        code: i32,
    },

    /// ws4sql was terminated by a signal
    #[error("ws4sql was terminated by signal {signal}")]
    Signaled {
        /// Signal number
        signal: i32,
    },
}

impl LauncherError {
    /// True when the failure happened before ws4sql could run.
    pub fn is_provisioning_failure(&self) -> bool {
        matches!(self, Self::Provision(_) | Self::Config { .. })
    }

    /// Exit code the launcher process should end with for this error.
    ///
    /// The child's own code is passed through unchanged; signal terminations
    /// map to `128 + signal` like a shell would report them.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::NonZeroExit { code } => *code,
            Self::Signaled { signal } => 128 + signal,
            _ => 1,
        }
    }
}
