//! Axum router wiring.
//!
//! The counter lives at the configured route (`/visitors` by default) next to
//! the operational endpoints.

use axum::{routing::get, Router};

use crate::{app_state::AppState, counter, ops};

pub fn build_router(state: AppState) -> Router {
    let route = state.cfg().server.route.clone();
    Router::new()
        .route(&route, get(counter::visitors))
        .route("/healthz", get(ops::healthz))
        .route("/readyz", get(ops::readyz))
        .route("/metrics", get(ops::metrics))
        .with_state(state)
}
