//! Shorthand words - a command line browser for vocabulary groups.
//!
//! Word groups are fetched from the cloud bucket and cached locally, so every
//! command keeps working offline with the last data that was downloaded.

mod cli;
mod commands;
mod output;

use std::io;
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::Cli;
use commands::Context;
use shorthand_core::Config;

/// Log file name prefix inside the log directory
const LOG_FILE_NAME: &str = "shorthand.log";

/// Initialize the tracing subscriber for logging.
///
/// The returned guard must stay alive until exit so buffered file logs are flushed.
fn init_tracing(log_dir: Option<PathBuf>) -> Option<WorkerGuard> {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_NAME);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (
                Some(fmt::layer().with_writer(writer).with_ansi(false)),
                Some(guard),
            )
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(file_layer)
        .with(filter)
        .init();

    guard
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let mut config = Config::load()?;
    if let Some(url) = &cli.base_url {
        config.base_url = Some(url.clone());
    }
    if let Some(dir) = &cli.cache_dir {
        config.cache_dir = Some(dir.clone());
    }

    let log_dir = if cli.log_file {
        Some(config.log_dir()?)
    } else {
        None
    };
    let _guard = init_tracing(log_dir);
    info!(base_url = config.base_url(), "shorthand starting");

    let ctx = Context::new(config, cli.json)?;
    commands::run(&ctx, cli.command).await
}
