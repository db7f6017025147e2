//! ws4sql launcher - downloads, caches and runs the prebuilt ws4sql server.
//!
//! The process exits with ws4sql's own exit code; launcher failures
//! (unsupported platform, download or extraction errors) exit with 1.

use std::process;

#[tokio::main]
async fn main() {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Run CLI and get exit code
    let exit_code = match ws4sql_launcher::cli::run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            e.exit_code()
        }
    };

    process::exit(exit_code);
}
