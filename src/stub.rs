//! This module provides a stand-in for the processor service: it accepts config PUTs,
//!   remembers the last one per processor and echoes it back.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use bytes::Bytes;
use parking_lot::RwLock;
use std::{collections::HashMap, sync::Arc};
use tracing::{info, warn};

use crate::{
    region_map::{parse_message, STREAM_TAG},
    sender::ConfigRequest,
};

/// Address the stub binds to unless overridden
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:37497";
/// Environment variable overriding [`DEFAULT_BIND_ADDR`]
pub const BIND_ADDR_VAR: &str = "STUB_BIND_ADDR";

/// Identifier of a processor, as it appears in the URL
pub type ProcessorId = u32;
/// Type of reference to the received configs
type ReceivedRef = Arc<RwLock<HashMap<ProcessorId, ConfigRequest>>>;

/// StubState keeps the latest config received for each processor.
#[derive(Clone, Default)]
pub struct StubState {
    /// Reference to the received configs
    received: ReceivedRef,
}

impl StubState {
    /// Latest config received for given processor, if any
    pub fn latest(&self, processor_id: ProcessorId) -> Option<ConfigRequest> {
        self.received.read().get(&processor_id).cloned()
    }
}

/// Router serving `/api/processors/:processor_id/config`
pub fn router(state: StubState) -> Router {
    Router::new()
        .route("/api/processors/:processor_id/config", get(get_config)  // `GET` returns the last config
                                                        .put(put_config)) // `PUT` replaces it
        .with_state(state)
}

/// Accepts a `{"text": ...}` body, records it and echoes it back.
/// Anything that is not such a body is a BAD_REQUEST; text that is not a region map is
///   still accepted, since only the processor knows how to interpret it.
async fn put_config(
    State(state): State<StubState>,
    Path(processor_id): Path<ProcessorId>,
    body: Bytes,
) -> Response {

    let request: ConfigRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(err) => {
            warn!(processor_id, error = %err, "rejected config body");
            return StatusCode::BAD_REQUEST.into_response();
        },
    };

    match parse_message(STREAM_TAG, &request.text) {
        Ok(entries) => info!(processor_id, entries = entries.len(), "received region map"),
        Err(err) => warn!(processor_id, error = %err, "config text is not a region map"),
    }

    state.received.write().insert(processor_id, request.clone());
    Json(request).into_response()
}

/// Returns the last config PUT for this processor, NOT_FOUND if there was none
async fn get_config(
    State(state): State<StubState>,
    Path(processor_id): Path<ProcessorId>,
) -> Response {

    match state.latest(processor_id) {
        None => StatusCode::NOT_FOUND.into_response(),
        Some(request) => Json(request).into_response(),
    }
}

// Hic sunt tests:

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

/// Builds a request against processor 101's config resource
fn config_request(method: &str, body: Body) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri("/api/processors/101/config")
        .header("Content-Type", "application/json")
        .body(body)
        .unwrap()
}

#[tokio::test]
async fn test_put_echoes_and_records() {

    let state = StubState::default();
    let body = r#"{"text":"ProbeA-AP 0,947;1,947;"}"#;

    let response = router(state.clone())
        .oneshot(config_request("PUT", Body::from(body)))
        .await
        .unwrap();

    // Test the body comes back unchanged and is remembered for processor 101
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.into_body().collect().await.unwrap().to_bytes(), body);
    assert_eq!(
        state.latest(101),
        Some(ConfigRequest { text: "ProbeA-AP 0,947;1,947;".to_string() })
    );
    assert!(state.latest(102).is_none());
}

#[tokio::test]
async fn test_put_accepts_unknown_text() {

    let state = StubState::default();

    let response = router(state.clone())
        .oneshot(config_request("PUT", Body::from(r#"{"text":"something else"}"#)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(state.latest(101).unwrap().text, "something else");
}

#[tokio::test]
async fn test_put_non_json_400s() {

    let state = StubState::default();

    let response = router(state.clone())
        .oneshot(config_request("PUT", Body::from("ProbeA-AP 0,947;")))
        .await
        .unwrap();

    // Test that a raw (non JSON) body returns BAD_REQUEST, nothing is recorded
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(state.latest(101).is_none());
}

#[tokio::test]
async fn test_put_wrong_shape_400s() {

    let state = StubState::default();

    let response = router(state.clone())
        .oneshot(config_request("PUT", Body::from(r#"{"text":"a","extra":true}"#)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(state.latest(101).is_none());
}

#[tokio::test]
async fn test_get_404s_before_put() {

    let response = router(StubState::default())
        .oneshot(config_request("GET", Body::empty()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_get_returns_last_put() {

    let app = router(StubState::default());

    for text in ["ProbeA-AP 0,1;", "ProbeA-AP 0,2;"] {
        let body = serde_json::to_string(&ConfigRequest { text: text.to_string() }).unwrap();
        let response = app.clone()
            .oneshot(config_request("PUT", Body::from(body)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = app.oneshot(config_request("GET", Body::empty())).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let received: ConfigRequest = serde_json::from_slice(&body).unwrap();
    assert_eq!(received.text, "ProbeA-AP 0,2;");
}
}
