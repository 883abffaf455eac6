use std::sync::Arc;

use axum::extract::Extension;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::{error::ApiError, state::AppState};
use loadlab_job_queue::{JobPayload, SubmitOutcome};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub duration_ms: Option<u64>,
    #[serde(default)]
    pub fail_always: bool,
}

impl SubmitRequest {
    fn into_payload(self) -> JobPayload {
        let mut payload = JobPayload::default();
        if let Some(name) = self.name {
            payload.name = name;
        }
        if let Some(duration_ms) = self.duration_ms {
            payload.duration_ms = duration_ms;
        }
        payload.fail_always = self.fail_always;
        payload
    }
}

/// POST /api/jobs/submit
/// Submit a job through admission control; a full queue rejects it.
pub async fn submit(
    Extension(state): Extension<Arc<AppState>>,
    body: Option<Json<SubmitRequest>>,
) -> Result<Json<Value>, ApiError> {
    let request = body.map(|value| value.0).unwrap_or_default();

    match state.engine.submit(request.into_payload()).await {
        SubmitOutcome::Accepted { job_id, position } => Ok(Json(json!({
            "status": "queued",
            "jobId": job_id,
            "queuePosition": position,
        }))),
        SubmitOutcome::Rejected { reason } => Ok(Json(json!({
            "status": "rejected",
            "reason": reason,
            "queueDepth": state.engine.queue_depth().await,
            "maxQueueSize": state.engine.max_queue_size(),
        }))),
    }
}
