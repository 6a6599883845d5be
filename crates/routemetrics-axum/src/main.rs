//! routemetrics demo server.
//!
//! Serves `/healthz`, `/users/:name` and `/metrics`, all instrumented.
//! Usage: `routemetrics-demo [config.yaml]`

use std::net::SocketAddr;
use tracing_subscriber::{fmt, EnvFilter};

use routemetrics_axum::{app_state, config, router};

#[tokio::main]
async fn main() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| config::DEFAULT_CONFIG_PATH.to_string());
    let cfg = config::load_from_file(&path).expect("config load failed");
    let listen: SocketAddr = cfg
        .server
        .listen
        .parse()
        .expect("server.listen must be a valid SocketAddr");

    // Broken bucket configuration must stop the process here.
    let state = app_state::AppState::new(cfg).expect("metrics init failed");
    let app = router::build_router(state);

    tracing::info!(%listen, config = %path, "routemetrics-demo starting");
    let listener = tokio::net::TcpListener::bind(listen).await.expect("failed to bind");

    axum::serve(listener, app).await.expect("server failed");
}
