use std::sync::Arc;

use axum::extract::Extension;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::{error::ApiError, state::AppState};
use loadlab_job_queue::{JobPayload, SubmitOutcome};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BurstRequest {
    #[serde(default = "default_count")]
    pub count: usize,
    #[serde(default)]
    pub duration_ms: Option<u64>,
}

const fn default_count() -> usize {
    15
}

impl Default for BurstRequest {
    fn default() -> Self {
        Self {
            count: default_count(),
            duration_ms: None,
        }
    }
}

/// POST /api/jobs/burst
/// Submit a burst of jobs to demonstrate backpressure.
pub async fn burst(
    Extension(state): Extension<Arc<AppState>>,
    body: Option<Json<BurstRequest>>,
) -> Result<Json<Value>, ApiError> {
    let request = body.map(|value| value.0).unwrap_or_default();

    let mut queued = 0;
    let mut rejected = 0;
    let mut job_ids = Vec::new();
    for i in 0..request.count {
        let mut payload = JobPayload::named(format!("burst-job-{i}"));
        if let Some(duration_ms) = request.duration_ms {
            payload.duration_ms = duration_ms;
        }
        match state.engine.submit(payload).await {
            SubmitOutcome::Accepted { job_id, .. } => {
                queued += 1;
                job_ids.push(job_id);
            }
            SubmitOutcome::Rejected { .. } => rejected += 1,
        }
    }

    Ok(Json(json!({
        "queued": queued,
        "rejected": rejected,
        "jobIds": job_ids,
        "queueDepth": state.engine.queue_depth().await,
        "maxQueueSize": state.engine.max_queue_size(),
    })))
}
