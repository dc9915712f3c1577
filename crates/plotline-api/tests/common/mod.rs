//! Shared test helpers for API integration tests.
#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use plotline_core::clock::Clock;
use plotline_core::store::GraphStore;
use plotline_store::{InMemoryGraphStore, InMemoryScriptStore};
use plotline_sync::{DEFAULT_DEBOUNCE, PositionSync};
use plotline_test_support::{FixedClock, ManualScheduler};
use tower::ServiceExt;
use uuid::Uuid;

use plotline_api::routes;
use plotline_api::state::AppState;

/// Fixed timestamp used across all integration tests.
fn fixed_clock() -> Arc<dyn Clock> {
    Arc::new(FixedClock(
        chrono::TimeZone::with_ymd_and_hms(&chrono::Utc, 2026, 1, 15, 10, 0, 0).unwrap(),
    ))
}

/// The app under test plus handles on its collaborators.
pub struct TestApp {
    pub router: Router,
    pub store: Arc<InMemoryGraphStore>,
    pub scripts: Arc<InMemoryScriptStore>,
    pub scheduler: Arc<ManualScheduler>,
}

impl TestApp {
    /// A clone of the router for one request.
    pub fn app(&self) -> Router {
        self.router.clone()
    }

    /// Creates a catalogued script through the API and returns its id.
    pub async fn new_script(&self) -> Uuid {
        let (status, json) = post_json(
            self.app(),
            "/api/v1/scripts",
            &serde_json::json!({ "title": "The Lighthouse" }),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED, "create failed: {json}");
        json["id"].as_str().unwrap().parse().unwrap()
    }

    /// Runs every flush due within one debounce window.
    pub async fn flush(&self) -> usize {
        self.scheduler.advance(DEFAULT_DEBOUNCE).await
    }

    /// Advances virtual time by `ms` milliseconds.
    pub async fn advance_ms(&self, ms: u64) -> usize {
        self.scheduler.advance(Duration::from_millis(ms)).await
    }

    /// What the store currently holds for `script_id`.
    pub async fn stored(&self, script_id: Uuid) -> Vec<plotline_core::model::Layer> {
        self.store.load_graph(script_id).await.unwrap()
    }
}

/// Build the full app router over an in-memory store and a virtual-time
/// scheduler. Uses the same route structure as `main.rs`.
pub fn build_test_app() -> TestApp {
    let store = Arc::new(InMemoryGraphStore::new());
    let scripts = Arc::new(InMemoryScriptStore::new());
    let scheduler = Arc::new(ManualScheduler::new());
    let sync = PositionSync::new(store.clone(), scheduler.clone(), DEFAULT_DEBOUNCE);
    let app_state = AppState::new(fixed_clock(), store.clone(), scripts.clone(), sync);

    let router = Router::new()
        .merge(routes::health::router())
        .nest("/api/v1/scripts", routes::script_routes())
        .with_state(app_state);

    TestApp {
        router,
        store,
        scripts,
        scheduler,
    }
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    // Extractor rejections come back as plain text.
    let json = if body_bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&body_bytes).unwrap_or_else(|_| {
            serde_json::Value::String(String::from_utf8_lossy(&body_bytes).into_owned())
        })
    };

    (status, json)
}

fn json_request(method: &str, uri: &str, body: &serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap()
}

/// Send a POST request with a JSON body and return the response.
pub async fn post_json(
    app: Router,
    uri: &str,
    body: &serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    send(app, json_request("POST", uri, body)).await
}

/// Send a PUT request with a JSON body and return the response.
pub async fn put_json(
    app: Router,
    uri: &str,
    body: &serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    send(app, json_request("PUT", uri, body)).await
}

/// Send a PATCH request with a JSON body and return the response.
pub async fn patch_json(
    app: Router,
    uri: &str,
    body: &serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    send(app, json_request("PATCH", uri, body)).await
}

/// Send a bodiless POST request and return the response.
pub async fn post_empty(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

/// Send a GET request and return the response.
pub async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

/// Send a DELETE request and return the status.
pub async fn delete(app: Router, uri: &str) -> StatusCode {
    let request = Request::builder()
        .method("DELETE")
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await.0
}

/// Base path for one script's routes.
pub fn script_uri(script_id: Uuid, rest: &str) -> String {
    format!("/api/v1/scripts/{script_id}{rest}")
}
