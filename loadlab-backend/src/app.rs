use std::sync::Arc;

use axum::{
    extract::Extension,
    http::StatusCode,
    routing::{get, post},
    Router,
};

use crate::state::AppState;

/// Build the primary axum router with the provided shared application state.
pub fn build_router(state: Arc<AppState>) -> Router {
    let api = Router::new()
        .route("/jobs/submit", post(crate::handlers::jobs::submit::submit))
        .route("/jobs/burst", post(crate::handlers::jobs::burst::burst))
        .route("/jobs/{id}", get(crate::handlers::jobs::get::get_job))
        .route(
            "/queue/status",
            get(crate::handlers::queue::status::queue_status),
        )
        .route(
            "/workers/start",
            post(crate::handlers::workers::start::start),
        )
        .route("/workers/stop", post(crate::handlers::workers::stop::stop))
        .route(
            "/workers/status",
            get(crate::handlers::workers::status::workers_status),
        )
        .route("/dlq", get(crate::handlers::dlq::list::list))
        .route("/dlq/{id}/retry", post(crate::handlers::dlq::retry::retry))
        .route("/dlq/clear", post(crate::handlers::dlq::clear::clear))
        .route("/stats", get(crate::handlers::admin::stats::stats))
        .route("/reset", post(crate::handlers::admin::reset::reset));

    Router::new()
        .nest("/api", api)
        .route("/health", get(health_handler))
        .route("/ready", get(ready_handler))
        .layer(Extension(state))
}

async fn health_handler() -> (StatusCode, &'static str) {
    (StatusCode::OK, "OK")
}

async fn ready_handler() -> (StatusCode, &'static str) {
    (StatusCode::OK, "ready")
}
