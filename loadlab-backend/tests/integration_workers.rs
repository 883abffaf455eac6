use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::util::ServiceExt;

use loadlab_backend::state::AppState;
use loadlab_job_queue::{EngineConfig, JobEngine};
use loadlab_jobs::SimulatedExecutor;

fn test_app(max_queue_size: usize) -> Router {
    let config = EngineConfig {
        max_queue_size,
        max_attempts: 3,
        retry_backoff: Duration::from_millis(10),
    };
    let engine = JobEngine::new(config, Arc::new(SimulatedExecutor::new()));
    loadlab_backend::build_router(Arc::new(AppState::new(engine, 3)))
}

async fn request_json(
    app: &Router,
    method: Method,
    path: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(path);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

/// Poll an endpoint until the condition holds or a deadline passes.
async fn poll_until(
    app: &Router,
    path: &str,
    mut condition: impl FnMut(&Value) -> bool,
) -> Value {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
    loop {
        let (_, body) = request_json(app, Method::GET, path, None).await;
        if condition(&body) {
            return body;
        }
        assert!(
            tokio::time::Instant::now() < deadline,
            "timed out polling {path}; last body: {body}"
        );
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn four_workers_drain_twenty_jobs() {
    let app = test_app(32);

    let (status, body) = request_json(
        &app,
        Method::POST,
        "/api/workers/start",
        Some(json!({ "count": 4 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "started");
    assert_eq!(body["workerCount"], 4);

    let (_, body) = request_json(
        &app,
        Method::POST,
        "/api/jobs/burst",
        Some(json!({ "count": 20, "durationMs": 0 })),
    )
    .await;
    assert_eq!(body["queued"], 20);

    let body = poll_until(&app, "/api/workers/status", |body| {
        body["stats"]["jobsCompleted"] == 20
    })
    .await;

    assert_eq!(body["running"], true);
    let workers = body["workers"].as_array().expect("workers array");
    assert_eq!(workers.len(), 4);
    let processed: u64 = workers
        .iter()
        .map(|w| w["jobsProcessed"].as_u64().unwrap_or(0))
        .sum();
    assert_eq!(processed, 20);

    poll_until(&app, "/api/workers/status", |body| body["queueDepth"] == 0).await;

    let (status, body) = request_json(&app, Method::POST, "/api/workers/stop", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "stopped");

    let (_, body) = request_json(&app, Method::GET, "/api/workers/status", None).await;
    assert_eq!(body["running"], false);
    assert_eq!(body["workers"].as_array().map(Vec::len), Some(0));
}

#[tokio::test]
async fn starting_twice_is_a_noop_and_stop_twice_is_harmless() {
    let app = test_app(10);

    let (_, body) = request_json(
        &app,
        Method::POST,
        "/api/workers/start",
        Some(json!({ "count": 2 })),
    )
    .await;
    assert_eq!(body["status"], "started");

    let (_, body) = request_json(
        &app,
        Method::POST,
        "/api/workers/start",
        Some(json!({ "count": 8 })),
    )
    .await;
    assert_eq!(body["status"], "already_running");
    assert_eq!(body["workerCount"], 2);

    for _ in 0..2 {
        let (status, body) = request_json(&app, Method::POST, "/api/workers/stop", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "stopped");
    }
}

#[tokio::test]
async fn start_without_a_body_uses_the_configured_default() {
    let app = test_app(10);

    let (status, body) = request_json(&app, Method::POST, "/api/workers/start", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "started");
    assert_eq!(body["workerCount"], 3);

    request_json(&app, Method::POST, "/api/workers/stop", None).await;
}

#[tokio::test]
async fn zero_workers_is_a_bad_request() {
    let app = test_app(10);

    let (status, body) = request_json(
        &app,
        Method::POST,
        "/api/workers/start",
        Some(json!({ "count": 0 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap_or("").contains("count"));
}
