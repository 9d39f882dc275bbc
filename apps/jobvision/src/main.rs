mod api_client;
mod auth;
mod cli;
mod config;
mod errors;
mod flow;
mod models;
mod predictor;
mod routes;
mod state;

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::cli::{Cli, Commands};
use crate::config::Config;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let config = cli.apply(Config::from_env()?);

    // Interactive commands print their own notifications; keep the log quiet
    // unless RUST_LOG asks otherwise. The server logs at the configured level.
    let default_level = match cli.command {
        Commands::Serve(_) => config.rust_log.as_str(),
        _ => "error",
    };

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), default_level))
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    debug!(
        "Starting JobVision v{} (api: {}, data: {})",
        env!("CARGO_PKG_VERSION"),
        config.api_url,
        config.data_dir.display()
    );

    cli::run(cli, config).await
}
