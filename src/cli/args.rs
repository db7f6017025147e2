//! Command line argument parsing.
//!
//! Every launcher option can also be supplied through a `WS4SQL_*`
//! environment variable; explicit flags win over the environment, which wins
//! over the config file. On/off variables accept `1`/`0`, `true`/`false`,
//! `yes`/`no` and `on`/`off`.

use crate::config::{FileConfig, Settings, SettingsBuilder};
use crate::error::Result;
use clap::{ArgAction, Parser, Subcommand, builder::BoolishValueParser};
use std::ffi::OsString;
use std::path::PathBuf;

/// Downloads, caches and launches the ws4sql server
#[derive(Parser, Debug)]
#[command(
    name = "ws4sql-launcher",
    version,
    about = "Downloads, caches and launches the ws4sql server",
    long_about = "Downloads the prebuilt ws4sql release for this platform on first use, caches it
in the per-user cache directory and runs it, relaying its output and exit code.

Usage:
  ws4sql-launcher run -- --db mydatabase.db
  ws4sql-launcher path
  ws4sql-launcher --ws4sql-version 0.17dev2 provision

Arguments after `run --` are passed to ws4sql untouched."
)]
pub struct Args {
    /// TOML config file (default: <config dir>/ws4sql/launcher.toml if present)
    #[arg(long, global = true, env = "WS4SQL_LAUNCHER_CONFIG", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Cache root directory (default: <cache dir>/ws4sql)
    #[arg(long, global = true, env = "WS4SQL_CACHE_DIR", value_name = "DIR")]
    pub cache_dir: Option<PathBuf>,

    /// ws4sql release to use
    #[arg(long, global = true, env = "WS4SQL_VERSION", value_name = "VERSION")]
    pub ws4sql_version: Option<String>,

    /// Release host root the versioned archive path is appended to
    #[arg(long, global = true, env = "WS4SQL_BASE_URL", value_name = "URL")]
    pub base_url: Option<String>,

    /// Expected SHA-256 of the release archive
    #[arg(long, global = true, env = "WS4SQL_SHA256", value_name = "HEX")]
    pub sha256: Option<String>,

    /// Redirect hops to follow while downloading
    #[arg(long, global = true, env = "WS4SQL_MAX_REDIRECTS", value_name = "N")]
    pub max_redirects: Option<usize>,

    /// Trust a cached executable without checking its recorded checksum
    #[arg(
        long,
        global = true,
        env = "WS4SQL_NO_VERIFY_CACHE",
        action = ArgAction::SetTrue,
        value_parser = BoolishValueParser::new()
    )]
    pub no_verify_cache: bool,

    /// Allow downloading over plain HTTP
    #[arg(
        long,
        global = true,
        env = "WS4SQL_ALLOW_HTTP",
        action = ArgAction::SetTrue,
        value_parser = BoolishValueParser::new()
    )]
    pub allow_http: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Launcher subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Download ws4sql if needed, then run it with the given arguments
    Run {
        /// Arguments passed through to ws4sql
        #[arg(trailing_var_arg = true, allow_hyphen_values = true, value_name = "ARGS")]
        args: Vec<OsString>,
    },

    /// Print where the ws4sql executable is cached (does not download)
    Path,

    /// Download ws4sql if needed and print its path
    Provision,
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Resolves settings from the config file and these arguments.
    pub fn settings(&self) -> Result<Settings> {
        let file = FileConfig::discover(self.config.as_deref())?;
        Ok(self.apply(SettingsBuilder::new().apply_file(&file)).build()?)
    }

    /// Layers the explicitly given options over `builder`.
    pub fn apply(&self, mut builder: SettingsBuilder) -> SettingsBuilder {
        if let Some(cache_dir) = &self.cache_dir {
            builder = builder.cache_root(cache_dir);
        }
        if let Some(version) = &self.ws4sql_version {
            builder = builder.version(version.clone());
        }
        if let Some(base_url) = &self.base_url {
            builder = builder.base_url(base_url.clone());
        }
        if let Some(sha256) = &self.sha256 {
            builder = builder.expected_sha256(sha256.clone());
        }
        if let Some(max_redirects) = self.max_redirects {
            builder = builder.max_redirects(max_redirects);
        }
        if self.no_verify_cache {
            builder = builder.verify_cache(false);
        }
        if self.allow_http {
            builder = builder.allow_insecure_http(true);
        }
        builder
    }
}
