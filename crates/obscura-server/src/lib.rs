//! # Obscura Server
//!
//! The Axum REST surface over `obscura-core`'s batch-oblivious request
//! engine: `POST /batch` for batches of client requests, `GET /health`
//! for liveness, and `GET /stats` for cache and decoy counters.
//!
//! This crate is ambient surface, not core — HTTP framing is an
//! external collaborator from the engine's point of view, and every
//! interesting invariant is enforced and tested in `obscura-core`.

mod handlers;
mod types;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use obscura_core::Engine;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub use handlers::{batch, health_check, stats};
pub use types::{ErrorResponse, HealthResponse, StatsResponse};

/// Application state shared across handlers: the engine bundling the
/// cache, scheduler, and backend fanout.
pub struct AppState {
    /// The batch-oblivious request engine.
    pub engine: Engine,
}

/// Builds the router, ready to be served or driven in-process by tests.
#[must_use]
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/stats", get(stats))
        .route("/batch", post(batch))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
