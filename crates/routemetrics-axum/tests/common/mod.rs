//! Shared helpers for router-level tests.

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use tower::ServiceExt;

use routemetrics_axum::{app_state::AppState, config, router};

pub fn state_from_yaml(yaml: &str) -> AppState {
    let cfg = config::load_from_str(yaml).expect("config must parse");
    AppState::new(cfg).expect("state must build")
}

pub fn app_from_yaml(yaml: &str) -> (Router, AppState) {
    let state = state_from_yaml(yaml);
    (router::build_router(state.clone()), state)
}

pub async fn send(app: &Router, method: &str, uri: &str) -> (StatusCode, String) {
    let req = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

pub async fn get(app: &Router, uri: &str) -> (StatusCode, String) {
    send(app, "GET", uri).await
}
