use std::sync::Arc;

use axum::extract::Extension;
use axum::Json;
use serde_json::{json, Value};

use crate::handlers::utils::stats_to_payload;
use crate::{error::ApiError, state::AppState};

/// GET /api/workers/status
/// Per-worker status plus the queue and counter snapshot callers poll.
pub async fn workers_status(
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Json<Value>, ApiError> {
    let status = state.engine.workers_status().await;

    let workers: Vec<Value> = status
        .workers
        .iter()
        .map(|worker| {
            json!({
                "id": worker.id,
                "status": worker.status.to_string(),
                "jobsProcessed": worker.jobs_processed,
            })
        })
        .collect();

    Ok(Json(json!({
        "running": status.running,
        "workers": workers,
        "queueDepth": status.queue_depth,
        "stats": stats_to_payload(&status.stats),
    })))
}
