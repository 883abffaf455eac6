use std::sync::Arc;

use axum::extract::Extension;
use axum::Json;
use serde_json::{json, Value};

use crate::{error::ApiError, state::AppState};

/// POST /api/workers/stop
/// Let every worker finish its current job, then wind the pool down.
/// Stopping a stopped pool is a no-op.
pub async fn stop(Extension(state): Extension<Arc<AppState>>) -> Result<Json<Value>, ApiError> {
    state.engine.stop_workers().await;

    Ok(Json(json!({ "status": "stopped" })))
}
