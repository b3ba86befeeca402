//! Command-line and environment configuration.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};

/// Climate API Server
#[derive(Parser, Debug, Clone)]
#[command(name = "climate-api")]
#[command(about = "Read-only HTTP API over daily climate observations")]
pub struct Args {
    /// Listen address
    #[arg(short, long, default_value = "0.0.0.0:5000", env = "CLIMATE_LISTEN_ADDR")]
    pub listen: String,

    /// Path to the observation SQLite database
    #[arg(
        short,
        long,
        default_value = "Resources/hawaii.sqlite",
        env = "CLIMATE_DATABASE_PATH"
    )]
    pub database: PathBuf,

    /// Log level
    #[arg(long, default_value = "info", env = "RUST_LOG")]
    pub log_level: String,

    /// Number of worker threads
    #[arg(long, env = "CLIMATE_WORKER_THREADS")]
    pub worker_threads: Option<usize>,

    /// Emit logs as JSON lines
    #[arg(long, default_value_t = true, action = ArgAction::Set, env = "CLIMATE_JSON_LOGS")]
    pub json_logs: bool,
}

impl Args {
    pub fn listen_addr(&self) -> Result<SocketAddr> {
        self.listen
            .parse()
            .with_context(|| format!("Invalid listen address: {}", self.listen))
    }
}
