use colored::*;
use std::io;
use std::process::ExitCode;
use suite2md::cli;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the `tracing` filter directives.
const LOG_ENV: &str = "SUITE2MD_LOG";

#[tokio::main]
async fn main() -> ExitCode {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    // Parse the command line and run the chosen command
    match cli::run().await {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("{} {:#}", "Error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}
