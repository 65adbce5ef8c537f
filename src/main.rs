use clap::Parser;
use eol::cli::{self, Cli};
use eol::error::EolError;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose {
        EnvFilter::new("eol=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    match cli::run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            if EolError::is_refusal(&err) {
                eprintln!(
                    "Point --cache-dir at a directory named eol, eol-cache or .eol-cache, \
                     or remove the cache files by hand."
                );
            }
            ExitCode::FAILURE
        }
    }
}
