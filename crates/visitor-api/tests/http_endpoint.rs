//! Endpoint tests: the axum router driven in-process.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

mod common;

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
    Router,
};
use tower::ServiceExt;

use visitor_api::app_state::AppState;
use visitor_api::router::build_router;
use visitor_api::store::{AttributeValue, RecordKey};

use common::{memory_state, test_config, FaultyStore};

async fn call(app: &Router, method: Method, uri: &str) -> (StatusCode, axum::http::HeaderMap, String) {
    let req = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let headers = resp.headers().clone();
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    (status, headers, String::from_utf8(bytes.to_vec()).unwrap())
}

#[tokio::test]
async fn get_visitors_counts_up() {
    let (state, _) = memory_state();
    let app = build_router(state);

    let (status, headers, body) = call(&app, Method::GET, "/visitors").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers["access-control-allow-origin"], "*");
    assert_eq!(headers["content-type"], "application/json");
    assert_eq!(body, r#"{"count":1}"#);

    let (_, _, body) = call(&app, Method::GET, "/visitors").await;
    assert_eq!(body, r#"{"count":2}"#);
}

#[tokio::test]
async fn seeded_record_is_served() {
    let (state, store) = memory_state();
    store.put_attribute(&RecordKey::default(), AttributeValue::Number(5));
    let app = build_router(state);

    let (_, _, body) = call(&app, Method::GET, "/visitors").await;
    let v: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(v["count"], 6);
}

#[tokio::test]
async fn store_failure_is_500_with_error_body() {
    let state = AppState::with_store(test_config(), Arc::new(FaultyStore::failing()));
    let app = build_router(state);

    let (status, headers, body) = call(&app, Method::GET, "/visitors").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(headers["content-type"], "application/json");

    let v: serde_json::Value = serde_json::from_str(&body).unwrap();
    let err = v["error"].as_str().unwrap();
    assert!(!err.is_empty());
    assert!(v.get("count").is_none());

    // the process keeps serving after a failure
    let (status, _, _) = call(&app, Method::GET, "/healthz").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn only_get_is_routed() {
    let (state, store) = memory_state();
    let app = build_router(state);

    let (status, _, _) = call(&app, Method::POST, "/visitors").await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(store.get_attribute(&RecordKey::default()), None);
}

#[tokio::test]
async fn custom_route_from_config() {
    let cfg = visitor_api::config::load_from_str(
        "version: 1\nserver:\n  route: \"/api/visits\"\nstore:\n  backend: memory\n",
    )
    .unwrap();
    let app = build_router(AppState::with_store(
        cfg,
        Arc::new(visitor_api::store::MemoryStore::new()),
    ));

    let (status, _, body) = call(&app, Method::GET, "/api/visits").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, r#"{"count":1}"#);

    let (status, _, _) = call(&app, Method::GET, "/visitors").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn ops_endpoints() {
    let (state, _) = memory_state();
    let app = build_router(state.clone());

    call(&app, Method::GET, "/visitors").await;

    let (status, _, body) = call(&app, Method::GET, "/readyz").await;
    assert_eq!((status, body.as_str()), (StatusCode::OK, "ready"));

    let (status, headers, body) = call(&app, Method::GET, "/metrics").await;
    assert_eq!(status, StatusCode::OK);
    assert!(headers["content-type"].to_str().unwrap().starts_with("text/plain"));
    assert!(body.contains("visitor_requests_total{outcome=\"success\"} 1"), "{body}");
    assert!(body.contains("visitor_last_count 1"), "{body}");

    state.set_draining();
    let (status, _, body) = call(&app, Method::GET, "/readyz").await;
    assert_eq!((status, body.as_str()), (StatusCode::SERVICE_UNAVAILABLE, "draining"));
}
