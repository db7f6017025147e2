//! Process launching.
//!
//! Makes sure the executable is provisioned, then runs it as a child
//! process, relaying its output and turning its exit status into a
//! [`Result`](crate::error::Result).

mod runner;

pub use runner::{Launcher, exit_result, spawn_and_wait};
