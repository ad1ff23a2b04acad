//! Health check handler.

use axum::{response::IntoResponse, Json};

use crate::types::HealthResponse;

/// Health check endpoint.
pub async fn health_check() -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}
