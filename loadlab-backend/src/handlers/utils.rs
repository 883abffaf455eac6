use std::collections::HashMap;

use serde_json::{json, Value};
use uuid::Uuid;

use crate::error::ApiError;
use loadlab_job_queue::{Job, StatsSnapshot};

/// Parse the `id` path parameter as a job id.
pub fn parse_job_id(params: &HashMap<String, String>) -> Result<Uuid, ApiError> {
    let raw = params
        .get("id")
        .ok_or_else(|| ApiError::bad_request("missing id path parameter"))?;
    raw.parse::<Uuid>()
        .map_err(|_| ApiError::bad_request(format!("invalid job id: {raw}")))
}

pub fn stats_to_payload(stats: &StatsSnapshot) -> Value {
    json!({
        "jobsSubmitted": stats.jobs_submitted,
        "jobsCompleted": stats.jobs_completed,
        "jobsFailed": stats.jobs_failed,
        "queueRejections": stats.queue_rejections,
    })
}

pub fn job_to_payload(job: &Job) -> Value {
    json!({
        "jobId": job.id,
        "state": job.state.to_string(),
        "attempts": job.attempts,
        "payload": {
            "name": job.payload.name,
            "durationMs": job.payload.duration_ms,
            "failAlways": job.payload.fail_always,
        },
        "createdAt": job.created_at.to_rfc3339(),
        "lastAttemptAt": job.last_attempt_at.map(|dt| dt.to_rfc3339()),
        "result": job.result,
        "error": job.error,
    })
}
