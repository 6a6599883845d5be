//! Demo application routes.

use axum::{extract::Path, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

pub async fn get_user(Path(name): Path<String>) -> impl IntoResponse {
    Json(json!({ "name": name }))
}

pub async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, "not found")
}
