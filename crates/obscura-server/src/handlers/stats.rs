//! Engine statistics handler.

use std::sync::Arc;

use axum::{extract::State, response::IntoResponse, Json};

use crate::types::StatsResponse;
use crate::AppState;

/// Returns cache and batch counters accumulated since startup.
pub async fn stats(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let cache = state.engine.cache_stats();
    let engine = state.engine.stats();

    Json(StatsResponse {
        cache_hits: cache.hits,
        cache_misses: cache.misses,
        cache_evictions: cache.evictions,
        cache_hit_rate: cache.hit_rate(),
        batches_run: engine.batches_run,
        dummy_reads_issued: engine.dummy_reads_issued,
        backend_errors: engine.backend_errors,
    })
}
