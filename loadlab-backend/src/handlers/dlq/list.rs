use std::sync::Arc;

use axum::extract::Extension;
use axum::Json;
use serde_json::{json, Value};

use crate::{error::ApiError, state::AppState};

/// GET /api/dlq
/// Jobs that exhausted their retry budget, awaiting operator action.
pub async fn list(Extension(state): Extension<Arc<AppState>>) -> Result<Json<Value>, ApiError> {
    let jobs = state.engine.dlq_list().await;

    let items: Vec<Value> = jobs
        .iter()
        .map(|job| {
            json!({
                "id": job.id,
                "attempts": job.attempts,
                "payload": {
                    "name": job.payload.name,
                    "durationMs": job.payload.duration_ms,
                    "failAlways": job.payload.fail_always,
                },
                "error": job.error,
            })
        })
        .collect();

    Ok(Json(json!({
        "count": items.len(),
        "jobs": items,
    })))
}
