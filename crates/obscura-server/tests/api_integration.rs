//! In-process integration tests for the Obscura REST surface.
//!
//! Drives the router directly via `tower::ServiceExt::oneshot` rather
//! than binding a real TCP socket.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use obscura_core::backend::InMemoryBackend;
use obscura_core::{Engine, ObscuraConfig};
use obscura_server::{router, AppState};
use serde_json::{json, Value};
use tower::ServiceExt;

fn test_app() -> axum::Router {
    let mut config = ObscuraConfig::default();
    config.batch.batch_size = 10;
    config.batch.fake_dummy_count = 3;
    config.batch.total_dummies = 20;

    let engine = Engine::new(&config, Arc::new(InMemoryBackend::new()));
    router(Arc::new(AppState { engine }))
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn health_reports_ok() {
    let app = test_app();
    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn stats_reports_zero_before_any_batch() {
    let app = test_app();
    let response = app
        .oneshot(Request::builder().uri("/stats").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["batches_run"], 0);
}

#[tokio::test]
async fn batch_with_empty_array_runs_and_returns_empty_map() {
    let app = test_app();
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/batch")
                .header("content-type", "application/json")
                .body(Body::from(json!([]).to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body, json!({}));
}

#[tokio::test]
async fn batch_with_malformed_body_returns_bad_request() {
    let app = test_app();
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/batch")
                .header("content-type", "application/json")
                .body(Body::from("not json"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["code"], "OBSCURA-005");
}

#[tokio::test]
async fn batch_write_then_read_round_trips_through_the_cache() {
    let app = test_app();

    let write_response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/batch")
                .header("content-type", "application/json")
                .body(Body::from(
                    json!([{"rid": "w1", "op": "write", "key": "alpha", "val": "hello"}]).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(write_response.status(), StatusCode::OK);

    let read_response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/batch")
                .header("content-type", "application/json")
                .body(Body::from(json!([{"rid": "r1", "op": "read", "key": "alpha"}]).to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(read_response.status(), StatusCode::OK);
    let body = body_json(read_response).await;
    assert_eq!(body["r1"], json!("hello"));
}
