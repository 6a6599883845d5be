//! Axum router wiring.
//!
//! Every route, and the fallback, is wrapped by `MetricsLayer`. The layer is
//! added after the routes so axum applies it per route.

use axum::{routing::get, Router};

use crate::{app_state::AppState, handlers, obs::HttpMetricsExt, ops};

pub fn build_router(state: AppState) -> Router {
    let metrics = state.metrics().layer();

    Router::new()
        .route("/healthz", get(ops::healthz))
        .route("/metrics", get(ops::metrics))
        .route("/users/:name", get(handlers::get_user))
        .fallback(handlers::not_found)
        .layer(metrics)
        .with_state(state)
}
