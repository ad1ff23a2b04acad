//! Request/response bodies for the REST surface.

use serde::Serialize;

/// JSON error body returned for malformed requests.
///
/// An individual request's absent key is silently dropped, never
/// surfaced as a client fault — this body is only used for the
/// envelope itself being malformed (e.g. invalid JSON).
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Stable error code, e.g. `OBSCURA-001`.
    pub code: &'static str,
    /// Human-readable error message.
    pub message: String,
}

/// Response body for `GET /health`.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Always `"healthy"` once the process has bound its listener.
    pub status: &'static str,
    /// The crate version, for quick deploy verification.
    pub version: &'static str,
}

/// Response body for `GET /stats`.
#[derive(Debug, Serialize)]
pub struct StatsResponse {
    /// Cache hits since startup.
    pub cache_hits: u64,
    /// Cache misses since startup.
    pub cache_misses: u64,
    /// Cache evictions since startup.
    pub cache_evictions: u64,
    /// Cache hit rate in `[0.0, 1.0]`.
    pub cache_hit_rate: f64,
    /// Batches run since startup.
    pub batches_run: u64,
    /// Dummy-decoy reads issued since startup.
    pub dummy_reads_issued: u64,
    /// Backend get/put failures logged since startup.
    pub backend_errors: u64,
}
