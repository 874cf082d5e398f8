//! Visitor counter API
//!
//! - `GET /visitors` : add one visit, return `{"count": N}` with CORS open to any origin
//! - `/healthz`, `/readyz`, `/metrics` : operational endpoints
//! - Config: first CLI argument, else `VISITOR_COUNTER_CONFIG`, else `visitor-counter.yaml`

use std::process::ExitCode;

use tracing_subscriber::{fmt, EnvFilter};

use visitor_api::{app_state, config, server};
use visitor_core::error::Result;

#[tokio::main]
async fn main() -> ExitCode {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(kind = e.kind().as_str(), error = %e, "visitor-api failed");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<()> {
    let path = config::resolve_path(std::env::args().nth(1));
    let cfg = config::load_from_file(&path)?;
    tracing::info!(%path, backend = ?cfg.store.backend, "config loaded");

    let state = app_state::AppState::new(cfg).await?;
    server::run(state).await
}
