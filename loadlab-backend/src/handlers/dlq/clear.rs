use std::sync::Arc;

use axum::extract::Extension;
use axum::Json;
use serde_json::{json, Value};

use crate::{error::ApiError, state::AppState};

/// POST /api/dlq/clear
/// Empty the dead-letter store unconditionally.
pub async fn clear(Extension(state): Extension<Arc<AppState>>) -> Result<Json<Value>, ApiError> {
    let removed = state.engine.dlq_clear().await;

    Ok(Json(json!({
        "status": "cleared",
        "jobsRemoved": removed,
    })))
}
