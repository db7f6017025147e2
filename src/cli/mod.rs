//! Command line interface for the ws4sql launcher.

mod args;

pub use args::{Args, Command};

use crate::{
    error::{LauncherError, Result},
    launcher::Launcher,
    provisioner::Provisioner,
};

/// Main CLI entry point
pub async fn run() -> Result<i32> {
    execute(Args::parse_args()).await
}

/// Executes already-parsed arguments and returns the process exit code.
///
/// For `run`, a non-zero exit of ws4sql is not an error of the launcher:
/// the child's code is returned as-is.
pub async fn execute(args: Args) -> Result<i32> {
    let settings = args.settings()?;

    match args.command {
        Command::Path => {
            println!("{}", settings.cache_location().executable_path().display());
            Ok(0)
        }
        Command::Provision => {
            let path = Provisioner::new(settings)?.ensure_executable().await?;
            println!("{}", path.display());
            Ok(0)
        }
        Command::Run { args } => match Launcher::new(settings)?.run(&args).await {
            Ok(()) => Ok(0),
            Err(e @ (LauncherError::NonZeroExit { .. } | LauncherError::Signaled { .. })) => {
                log::debug!("{}", e);
                Ok(e.exit_code())
            }
            Err(e) => Err(e),
        },
    }
}
