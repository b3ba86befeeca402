//! Climate API Server
//!
//! Read-only HTTP API over a local climate observation database.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

use climate_api::config::Args;
use climate_api::routes::build_router;
use climate_api::state::AppState;

fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Build runtime with configured threads
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();

    if let Some(threads) = args.worker_threads {
        runtime_builder.worker_threads(threads);
    }

    let runtime = runtime_builder
        .build()
        .context("Failed to create Tokio runtime")?;

    runtime.block_on(run_server(args))
}

fn init_tracing(args: &Args) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    let builder = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true);

    if args.json_logs {
        builder.json().init();
    } else {
        builder.init();
    }
}

async fn run_server(args: Args) -> Result<()> {
    init_tracing(&args);

    info!("Starting climate API server");

    // Fail fast on bad configuration before touching storage
    let addr = args.listen_addr()?;

    let prometheus_handle = metrics_exporter_prometheus::PrometheusBuilder::new()
        .install_recorder()
        .context("Failed to install Prometheus recorder")?;

    info!("Prometheus metrics exporter initialized");

    // A missing or malformed database is fatal at startup
    let state = match AppState::new(&args.database).await {
        Ok(state) => Arc::new(state.with_prometheus(prometheus_handle)),
        Err(e) => {
            error!(database = %args.database.display(), "Failed to initialize application state: {}", e);
            std::process::exit(1);
        }
    };

    let app = build_router(state);

    info!("Climate API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    axum::serve(listener, app).await.context("Server failed")?;

    Ok(())
}
