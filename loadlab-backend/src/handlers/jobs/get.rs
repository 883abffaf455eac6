use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{Extension, Path};
use axum::Json;
use serde_json::Value;

use crate::handlers::utils::{job_to_payload, parse_job_id};
use crate::{error::ApiError, state::AppState};

/// GET /api/jobs/{id}
/// Snapshot of a tracked job for status polling.
pub async fn get_job(
    Extension(state): Extension<Arc<AppState>>,
    Path(path): Path<HashMap<String, String>>,
) -> Result<Json<Value>, ApiError> {
    let id = parse_job_id(&path)?;

    let job = state
        .engine
        .job(id)
        .await
        .ok_or_else(|| ApiError::not_found(format!("job not found: {id}")))?;

    Ok(Json(job_to_payload(&job)))
}
