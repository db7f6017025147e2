//! Launcher configuration.
//!
//! [`Settings`] is the frozen configuration handed to the provisioner and
//! launcher. It is assembled by [`SettingsBuilder`] from, in increasing
//! precedence: built-in defaults, a TOML [`FileConfig`], then explicit
//! overrides (environment variables and command line flags, see `cli`).

mod builder;
mod core;
mod file;

pub use builder::SettingsBuilder;
pub use core::{DEFAULT_VERSION, Settings};
pub use file::{CONFIG_FILE_NAME, FileConfig};
