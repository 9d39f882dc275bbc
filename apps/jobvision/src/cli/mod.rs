//! Command-line surface: the terminal stand-in for the prediction page and
//! the sign-in form, plus the stub API server.

pub mod account;
pub mod predict;
pub mod serve;
pub mod shell;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tokio::sync::broadcast::{self, error::TryRecvError};

use crate::api_client::{HttpPredictionClient, PredictionApi};
use crate::config::Config;
use crate::flow::notifications::Notification;

/// Check job postings against the JobVision prediction API.
#[derive(Debug, Parser)]
#[command(name = "jobvision", version, about)]
pub struct Cli {
    /// Prediction API base URL (overrides JOBVISION_API_URL).
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Directory holding local accounts and the session (overrides JOBVISION_DATA_DIR).
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Analyze one job description and print the verdict.
    Predict(PredictArgs),
    /// Interactive session: paste a posting, then `:predict`.
    Shell,
    /// Create a local account and sign in.
    Register(RegisterArgs),
    /// Sign in to a local account.
    Login(LoginArgs),
    /// Sign out.
    Logout,
    /// Show the signed-in user.
    Whoami,
    /// Run the rule-based stub of the prediction API.
    Serve(ServeArgs),
}

#[derive(Debug, Args)]
pub struct PredictArgs {
    /// Job description text. Read from --file or stdin when omitted.
    pub text: Option<String>,

    /// Read the job description from a file.
    #[arg(long, short, conflicts_with = "text")]
    pub file: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct RegisterArgs {
    #[arg(long)]
    pub email: String,
    /// Full name shown when signed in.
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub password: String,
}

#[derive(Debug, Args)]
pub struct LoginArgs {
    #[arg(long)]
    pub email: String,
    #[arg(long)]
    pub password: String,
}

#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Port to listen on (overrides PORT).
    #[arg(long)]
    pub port: Option<u16>,
}

impl Cli {
    /// Layers command-line overrides on top of the environment configuration.
    pub fn apply(&self, mut config: Config) -> Config {
        if let Some(url) = &self.api_url {
            config.api_url = url.trim_end_matches('/').to_string();
        }
        if let Some(dir) = &self.data_dir {
            config.data_dir = dir.clone();
        }
        if let Commands::Serve(ServeArgs { port: Some(port) }) = &self.command {
            config.port = *port;
        }
        config
    }
}

pub async fn run(cli: Cli, config: Config) -> Result<ExitCode> {
    match cli.command {
        Commands::Predict(args) => predict::run(args, &config).await,
        Commands::Shell => shell::run(&config).await,
        Commands::Register(args) => account::register(args, &config),
        Commands::Login(args) => account::login(args, &config),
        Commands::Logout => account::logout(&config),
        Commands::Whoami => account::whoami(&config),
        Commands::Serve(_) => serve::run(config.port).await.map(|()| ExitCode::SUCCESS),
    }
}

fn http_api(config: &Config) -> Result<Arc<dyn PredictionApi>> {
    let client = HttpPredictionClient::new(config.api_url.clone())
        .context("failed to build HTTP client")?;
    Ok(Arc::new(client))
}

/// Prints every notification already waiting on `feed` to stderr.
fn drain_notifications(feed: &mut broadcast::Receiver<Notification>) {
    loop {
        match feed.try_recv() {
            Ok(notification) => eprintln!("{notification}"),
            Err(TryRecvError::Lagged(_)) => continue,
            Err(TryRecvError::Empty | TryRecvError::Closed) => break,
        }
    }
}
