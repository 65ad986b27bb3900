//! Request handlers for the API endpoints.

use std::sync::Arc;

use axum::Json;
use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use serde_json::Value;
use tracing::{info, warn};

use super::AppState;
use super::types::{ErrorResponse, NetworkInfo, SampleInfo, ViewQuery};
use crate::loader::{LoadError, LoadMethod, SampleNetwork};
use crate::session::Session;
use crate::views::{View, dispatch};

type ApiError = (StatusCode, Json<ErrorResponse>);

fn error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
}

/// Runs `f` against the current session under the read lock.
fn with_session<T>(state: &AppState, f: impl FnOnce(&Session) -> T) -> Result<T, ApiError> {
    let guard = state
        .session
        .read()
        .map_err(|_| error(StatusCode::INTERNAL_SERVER_ERROR, "session lock poisoned"))?;
    let session = guard
        .as_ref()
        .ok_or_else(|| error(StatusCode::NOT_FOUND, "no network loaded"))?;
    Ok(f(session))
}

fn load_status(err: &LoadError) -> StatusCode {
    match err {
        LoadError::UnknownSample { .. } => StatusCode::NOT_FOUND,
        LoadError::UnsupportedFormat(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
        _ => StatusCode::UNPROCESSABLE_ENTITY,
    }
}

/// Loads off the async workers, then swaps the session in.
async fn replace_session(state: &AppState, method: LoadMethod) -> Result<Json<NetworkInfo>, ApiError> {
    let palette = state.palette.clone();
    let session = tokio::task::spawn_blocking(move || Session::open(&method, palette))
        .await
        .map_err(|e| error(StatusCode::INTERNAL_SERVER_ERROR, format!("load task failed: {e}")))?
        .map_err(|e| {
            warn!(error = %e, "network load rejected");
            error(load_status(&e), e.to_string())
        })?;

    let info = NetworkInfo::from(&session);
    let mut guard = state
        .session
        .write()
        .map_err(|_| error(StatusCode::INTERNAL_SERVER_ERROR, "session lock poisoned"))?;
    *guard = Some(session);
    info!(source = %info.source, "session replaced");
    Ok(Json(info))
}

/// `GET /network` → 200 + `NetworkInfo`, or 404 before the first load.
pub async fn get_network(State(state): State<Arc<AppState>>) -> Result<Json<NetworkInfo>, ApiError> {
    with_session(&state, |s| NetworkInfo::from(s)).map(Json)
}

/// `GET /samples` → 200 + `Vec<SampleInfo>`
pub async fn get_samples() -> Json<Vec<SampleInfo>> {
    Json(SampleNetwork::ALL.into_iter().map(SampleInfo::from).collect())
}

/// `POST /network/sample/{name}` → 200 + `NetworkInfo`, 404 for unknown names.
pub async fn load_sample(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<Json<NetworkInfo>, ApiError> {
    let sample = name
        .parse::<SampleNetwork>()
        .map_err(|e| error(load_status(&e), e.to_string()))?;
    replace_session(&state, LoadMethod::Sample(sample)).await
}

/// `POST /network/upload` with the archive as body → 200 + `NetworkInfo`.
///
/// A failed upload leaves the previous session in place.
pub async fn upload_network(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<NetworkInfo>, ApiError> {
    replace_session(&state, LoadMethod::Upload(body.to_vec())).await
}

fn view(state: &AppState, view: View, query: &ViewQuery) -> Result<Json<Value>, ApiError> {
    let request = query
        .to_request(view)
        .map_err(|e| error(StatusCode::BAD_REQUEST, e))?;
    with_session(state, |session| serde_json::to_value(dispatch(session, &request)))?
        .map(Json)
        .map_err(|e| error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
}

/// `GET /views/summary?component=...`
pub async fn get_summary(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ViewQuery>,
) -> Result<Json<Value>, ApiError> {
    view(&state, View::Summary, &query)
}

/// `GET /views/temporal?component=&attribute=&mode=&select=a,b`
pub async fn get_temporal(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ViewQuery>,
) -> Result<Json<Value>, ApiError> {
    view(&state, View::Temporal, &query)
}

/// `GET /views/geospatial?component=...`
pub async fn get_geospatial(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ViewQuery>,
) -> Result<Json<Value>, ApiError> {
    view(&state, View::Geospatial, &query)
}

/// `GET /views/metadata`
pub async fn get_metadata(State(state): State<Arc<AppState>>) -> Result<Json<Value>, ApiError> {
    view(&state, View::Metadata, &ViewQuery::default())
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::Request;
    use tower::util::ServiceExt;

    use super::*;
    use crate::api::router;
    use crate::shape::color::CarrierPalette;

    fn loaded_state() -> Arc<AppState> {
        let session = Session::open(
            &LoadMethod::Sample(SampleNetwork::AcDcMeshed),
            CarrierPalette::default(),
        )
        .unwrap();
        Arc::new(AppState::with_session(session))
    }

    async fn send(state: Arc<AppState>, method: &str, uri: &str, body: Body) -> (StatusCode, Value) {
        let req = Request::builder().method(method).uri(uri).body(body).unwrap();
        let resp = router(state).oneshot(req).await.unwrap();
        let status = resp.status();
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&body).unwrap_or(Value::Null))
    }

    async fn get(state: Arc<AppState>, uri: &str) -> (StatusCode, Value) {
        send(state, "GET", uri, Body::empty()).await
    }

    #[tokio::test]
    async fn empty_state_returns_404() {
        let state = Arc::new(AppState::empty(CarrierPalette::default()));
        let (status, json) = get(state, "/views/summary").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"], "no network loaded");
    }

    #[tokio::test]
    async fn summary_returns_counts() {
        let (status, json) = get(loaded_state(), "/views/summary").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["view"], "summary");
        assert_eq!(json["snapshot_count"], 10);
        assert_eq!(json["counts"][0]["kind"], "generators");
        assert_eq!(json["section"]["table"]["status"], "ready");
    }

    #[tokio::test]
    async fn temporal_query_is_applied() {
        let (status, json) = get(loaded_state(), "/views/temporal?component=loads&mode=sum").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["kind"], "loads");
        assert_eq!(json["mode"], "sum_all");
        assert_eq!(json["chart"]["value"]["title"], "Total Load p");
    }

    #[tokio::test]
    async fn unavailable_panel_is_not_an_error() {
        let (status, json) = get(loaded_state(), "/views/geospatial?component=storage_units").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["section"]["table"]["status"], "unavailable");
        assert_eq!(json["section"]["table"]["value"]["reason"], "no_rows");
    }

    #[tokio::test]
    async fn bad_mode_returns_400() {
        let (status, json) = get(loaded_state(), "/views/temporal?mode=stacked").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json.get("error").is_some());
    }

    #[tokio::test]
    async fn sample_load_replaces_session() {
        let state = loaded_state();
        let (status, json) = send(state.clone(), "POST", "/network/sample/scigrid_de", Body::empty()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["source"], "sample scigrid_de");

        let (_, json) = get(state, "/network").await;
        assert_eq!(json["name"], "scigrid-de");
        assert_eq!(json["snapshots"], 24);
    }

    #[tokio::test]
    async fn unknown_sample_returns_404() {
        let (status, _) = send(loaded_state(), "POST", "/network/sample/europe", Body::empty()).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn rejected_upload_keeps_previous_session() {
        let state = loaded_state();
        let body = Body::from(b"CDF\x01rest-of-netcdf".to_vec());
        let (status, _) = send(state.clone(), "POST", "/network/upload", body).await;
        assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);

        let (status, json) = get(state, "/network").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["name"], "AC-DC-Meshed");
    }

    #[tokio::test]
    async fn json_upload_is_loaded() {
        let state = loaded_state();
        let archive = r#"{
            "name": "uploaded",
            "snapshots": ["2020-01-01 00:00:00"],
            "components": {"buses": {"index": ["b1"], "columns": {"x": [1.0], "y": [2.0]}}}
        }"#;
        let (status, json) = send(state.clone(), "POST", "/network/upload", Body::from(archive)).await;
        assert_eq!(status, StatusCode::OK, "{json}");
        assert_eq!(json["name"], "uploaded");
        assert!(json["source"].as_str().is_some_and(|s| s.starts_with("uploaded archive")));
    }

    #[tokio::test]
    async fn samples_are_listed() {
        let (status, json) = get(loaded_state(), "/samples").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json.as_array().map(Vec::len), Some(3));
        assert_eq!(json[0]["name"], "ac_dc_meshed");
    }
}
