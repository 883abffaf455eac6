use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{Extension, Path};
use axum::Json;
use serde_json::{json, Value};

use crate::handlers::utils::parse_job_id;
use crate::{error::ApiError, state::AppState};
use loadlab_job_queue::SubmitOutcome;

/// POST /api/dlq/{id}/retry
/// Resubmit a dead-lettered job with its attempts reset. Goes through the
/// same admission control as a fresh submission, so a full queue rejects it.
pub async fn retry(
    Extension(state): Extension<Arc<AppState>>,
    Path(path): Path<HashMap<String, String>>,
) -> Result<Json<Value>, ApiError> {
    let id = parse_job_id(&path)?;

    match state.engine.dlq_retry(id).await? {
        SubmitOutcome::Accepted { job_id, position } => Ok(Json(json!({
            "status": "requeued",
            "jobId": job_id,
            "queuePosition": position,
        }))),
        SubmitOutcome::Rejected { reason } => Ok(Json(json!({
            "status": "rejected",
            "reason": reason,
        }))),
    }
}
