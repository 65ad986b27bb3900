//! Integration tests for the JSON API feature.

#![cfg(feature = "api")]

mod common;

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use tower::util::ServiceExt;

use network_explorer::api::{AppState, router};
use network_explorer::shape::color::CarrierPalette;

async fn call(state: &Arc<AppState>, method: &str, uri: &str, body: Body) -> (StatusCode, serde_json::Value) {
    let req = Request::builder()
        .method(method)
        .uri(uri)
        .body(body)
        .unwrap();
    let resp = router(Arc::clone(state)).oneshot(req).await.unwrap();
    let status = resp.status();
    let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null))
}

#[tokio::test]
async fn upload_then_browse_views() {
    let state = Arc::new(AppState::empty(CarrierPalette::default()));

    let (status, _) = call(&state, "GET", "/network", Body::empty()).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, info) = call(&state, "POST", "/network/upload", Body::from(common::archive_json())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(info["name"], "archive-net");
    assert_eq!(info["snapshots"], 2);

    let (status, json) = call(&state, "GET", "/views/geospatial?component=generators", Body::empty()).await;
    assert_eq!(status, StatusCode::OK);
    let points = json["section"]["map"].as_array().expect("map points");
    assert_eq!(points.len(), 2);
    assert_eq!(points[0]["x"], 4.9);

    let (status, json) = call(
        &state,
        "GET",
        "/views/temporal?component=buses&attribute=marginal_price",
        Body::empty(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["chart"]["status"], "ready");
    assert_eq!(json["chart"]["value"]["title"], "Bus marginal_price time series");

    let (status, json) = call(&state, "GET", "/views/metadata", Body::empty()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["yaml"], "scenario: fixture\n");
}

#[tokio::test]
async fn empty_selection_is_a_notice() {
    let state = Arc::new(AppState::with_session(common::sample_session(
        network_explorer::loader::SampleNetwork::ScigridDe,
    )));
    let (status, json) = call(&state, "GET", "/views/temporal?select=", Body::empty()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["chart"]["status"], "unavailable");
    assert_eq!(json["chart"]["value"]["reason"], "empty_selection");
}

#[tokio::test]
async fn unknown_component_is_a_bad_request() {
    let state = Arc::new(AppState::with_session(common::sample_session(
        network_explorer::loader::SampleNetwork::AcDcMeshed,
    )));
    let (status, json) = call(&state, "GET", "/views/summary?component=shunts", Body::empty()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().is_some_and(|e| e.contains("shunts")));
}
