//! Batch-submission handler: `POST /batch`.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use obscura_core::request::ClientRequest;
use obscura_core::Error;

use crate::types::ErrorResponse;
use crate::AppState;

/// Accepts a JSON array of `{rid, op, key, val}` client requests and
/// runs them as one batch, returning the `rid -> value-or-list`
/// response map.
///
/// A request with an empty key is silently dropped, not surfaced as a
/// fault; only a malformed envelope itself — body that does not parse
/// as the expected JSON shape — produces a 400.
pub async fn batch(
    State(state): State<Arc<AppState>>,
    body: Result<Json<Vec<ClientRequest>>, JsonRejection>,
) -> impl IntoResponse {
    let requests = match body {
        Ok(Json(requests)) => requests,
        Err(rejection) => {
            let err = Error::Request(rejection.body_text());
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    code: err.code(),
                    message: err.to_string(),
                }),
            )
                .into_response();
        }
    };

    let responses = state.engine.run_batch(requests).await;
    Json(responses).into_response()
}
