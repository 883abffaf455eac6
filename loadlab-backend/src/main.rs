//! loadlab Backend Server
//!
//! Entry point for the loadlab-backend server: configuration loading,
//! engine construction and HTTP server startup.

use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;

use loadlab_backend::state::AppState;
use loadlab_job_queue::{EngineConfig, JobEngine};
use loadlab_jobs::SimulatedExecutor;

mod cli;
mod tracing_setup;

use cli::CliArgs;
use tracing_setup::install_tracing_from_config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();

    if args.help_requested {
        CliArgs::print_help();
        return Ok(());
    }

    // Resolve config path: CLI > environment variable
    let config_path = args
        .config_path
        .or_else(|| std::env::var("LOADLAB_CONFIG_PATH").ok());

    eprintln!("[STARTUP] Loading config from: {:?}", config_path);
    let config = load_config(&config_path)?;
    loadlab_config::validate_config(&config)
        .map_err(|e| anyhow::anyhow!("invalid configuration: {e}"))?;

    install_tracing_from_config(&config.logging);

    tracing::info!(
        max_queue_size = config.engine.max_queue_size,
        max_attempts = config.engine.max_attempts,
        worker_count = config.engine.worker_count,
        retry_backoff_ms = config.engine.retry_backoff_ms,
        "engine configuration"
    );

    let engine_config = EngineConfig {
        max_queue_size: config.engine.max_queue_size,
        max_attempts: config.engine.max_attempts,
        retry_backoff: Duration::from_millis(config.engine.retry_backoff_ms),
    };
    let engine = JobEngine::new(engine_config, Arc::new(SimulatedExecutor::new()));

    let state = Arc::new(AppState::new(engine, config.engine.worker_count));
    let app = loadlab_backend::build_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    eprintln!("[STARTUP] ✓ Server listening on {addr}");
    tracing::info!(%addr, "server listening");

    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}

/// Load configuration from file or defaults.
fn load_config(path: &Option<String>) -> anyhow::Result<loadlab_config::Config> {
    match path.as_deref() {
        Some(p) => loadlab_config::load_config(Some(p)).map_err(|e| {
            eprintln!("failed to load configuration: {e}");
            anyhow::anyhow!(e.to_string())
        }),
        None => loadlab_config::load_config::<&std::path::Path>(None).map_err(|e| {
            eprintln!("failed to load configuration: {e}");
            anyhow::anyhow!(e.to_string())
        }),
    }
}
