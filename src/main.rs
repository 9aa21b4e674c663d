//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `httpstat` library that handles:
//! - Command-line argument parsing
//! - Environment variable loading (.env file)
//! - Logger initialization
//! - Printing each hop as it completes
//!
//! All core functionality is implemented in the library crate.

use anyhow::{Context, Result};
use clap::Parser;
use std::process;

use httpstat::initialization::{init_crypto_provider, init_logger_with};
use httpstat::{execute, render_hop, Config, Opt, Style};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Load environment variables from .env file (if it exists), e.g. RUST_LOG
    let _ = dotenvy::dotenv();

    // Usage errors exit with status 2
    let opt = Opt::parse();

    init_logger_with(opt.log_level.clone().into(), opt.log_format.clone())
        .context("Failed to initialize logger")?;

    // Initialize crypto provider for TLS operations
    init_crypto_provider();

    let config = match Config::try_from(opt) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("httpstat: {e:#}");
            process::exit(1);
        }
    };

    let style = Style::detect();
    if let Err(e) = execute(&config, |hop| print!("{}", render_hop(&hop, style))).await {
        eprintln!("httpstat: {e:#}");
        process::exit(1);
    }
    Ok(())
}
