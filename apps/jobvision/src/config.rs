use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

pub const DEFAULT_API_URL: &str = "http://localhost:5000";
pub const DEFAULT_DATA_DIR: &str = ".jobvision";
const DEFAULT_PREDICT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_HEALTH_TIMEOUT_SECS: u64 = 5;

/// Application configuration loaded from environment variables.
/// Every value has a default; only malformed numbers are rejected.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the prediction API, without the `/api/...` suffix.
    pub api_url: String,
    /// Directory backing the local user table and session.
    pub data_dir: PathBuf,
    pub predict_timeout: Duration,
    pub health_timeout: Duration,
    /// Port for `jobvision serve`.
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            api_url: std::env::var("JOBVISION_API_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|_| DEFAULT_API_URL.to_string()),
            data_dir: std::env::var("JOBVISION_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_DATA_DIR)),
            predict_timeout: secs_env(
                "JOBVISION_PREDICT_TIMEOUT_SECS",
                DEFAULT_PREDICT_TIMEOUT_SECS,
            )?,
            health_timeout: secs_env("JOBVISION_HEALTH_TIMEOUT_SECS", DEFAULT_HEALTH_TIMEOUT_SECS)?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "5000".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_url: DEFAULT_API_URL.to_string(),
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            predict_timeout: Duration::from_secs(DEFAULT_PREDICT_TIMEOUT_SECS),
            health_timeout: Duration::from_secs(DEFAULT_HEALTH_TIMEOUT_SECS),
            port: 5000,
            rust_log: "info".to_string(),
        }
    }
}

fn secs_env(key: &str, default: u64) -> Result<Duration> {
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<u64>()
            .map(Duration::from_secs)
            .with_context(|| format!("{key} must be a whole number of seconds")),
        Err(_) => Ok(Duration::from_secs(default)),
    }
}
