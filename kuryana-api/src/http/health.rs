//! Index and health check endpoints

use axum::{response::IntoResponse, routing::get, Json, Router};
use serde_json::json;

use crate::http::AppState;

pub const INDEX_MESSAGE: &str = "A Simple and Basic MDL Scraper API";

pub fn create_health_router() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health_check))
}

pub async fn index() -> impl IntoResponse {
    Json(json!({ "message": INDEX_MESSAGE }))
}

/// Always OK while the process is serving
pub async fn health_check() -> impl IntoResponse {
    "OK"
}
