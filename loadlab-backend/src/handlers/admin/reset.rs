use std::sync::Arc;

use axum::extract::Extension;
use axum::Json;
use serde_json::{json, Value};

use crate::{error::ApiError, state::AppState};

/// POST /api/reset
/// Return the whole subsystem to its initial empty, idle condition.
pub async fn reset(Extension(state): Extension<Arc<AppState>>) -> Result<Json<Value>, ApiError> {
    state.engine.reset().await;

    Ok(Json(json!({ "status": "reset" })))
}
