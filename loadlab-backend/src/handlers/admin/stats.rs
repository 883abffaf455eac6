use std::sync::Arc;

use axum::extract::Extension;
use axum::Json;
use serde_json::{json, Value};

use crate::handlers::utils::stats_to_payload;
use crate::{error::ApiError, state::AppState};

/// GET /api/stats
/// Overall engine counters and occupancy.
pub async fn stats(Extension(state): Extension<Arc<AppState>>) -> Result<Json<Value>, ApiError> {
    let engine = &state.engine;
    let (running, workers) = {
        let status = engine.workers_status().await;
        (status.running, status.workers.len())
    };

    Ok(Json(json!({
        "stats": stats_to_payload(&engine.stats().await),
        "queueDepth": engine.queue_depth().await,
        "dlqDepth": engine.dlq_len().await,
        "trackedJobs": engine.tracked_jobs().await,
        "workersRunning": running,
        "workerCount": workers,
    })))
}
