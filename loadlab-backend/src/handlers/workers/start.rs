use std::sync::Arc;

use axum::extract::Extension;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::{error::ApiError, state::AppState};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartRequest {
    #[serde(default)]
    pub count: Option<usize>,
}

/// POST /api/workers/start
/// Spin up the worker pool; a no-op while already running.
pub async fn start(
    Extension(state): Extension<Arc<AppState>>,
    body: Option<Json<StartRequest>>,
) -> Result<Json<Value>, ApiError> {
    let request = body.map(|value| value.0).unwrap_or_default();
    let count = request.count.unwrap_or(state.default_worker_count);
    if count == 0 {
        return Err(ApiError::bad_request("count must be at least 1"));
    }

    let outcome = state.engine.start_workers(count).await;

    Ok(Json(json!({
        "status": if outcome.already_running { "already_running" } else { "started" },
        "workerCount": outcome.worker_count,
    })))
}
