use std::sync::Arc;

use axum::extract::Extension;
use axum::Json;
use serde_json::{json, Value};

use crate::handlers::utils::stats_to_payload;
use crate::{error::ApiError, state::AppState};

/// GET /api/queue/status
/// Depth, capacity and per-state job counts.
pub async fn queue_status(
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Json<Value>, ApiError> {
    let status = state.engine.queue_status().await;

    Ok(Json(json!({
        "queueDepth": status.queue_depth,
        "maxQueueSize": status.max_queue_size,
        "queued": status.counts.queued,
        "processing": status.counts.processing,
        "completed": status.counts.completed,
        "failed": status.counts.failed,
        "deadLettered": status.counts.dead_lettered,
        "stats": stats_to_payload(&status.stats),
    })))
}
