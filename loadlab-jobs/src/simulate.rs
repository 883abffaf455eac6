//! Simulated workload executor.

use std::time::Duration;

use async_trait::async_trait;
use loadlab_job_queue::{JobExecutor, JobPayload, JobQueueError};

/// Executor that pretends to do work.
///
/// Sleeps for the payload's `duration_ms`, then succeeds, unless the payload
/// carries the poison flag, in which case every attempt fails after the
/// sleep. This is the workload behind the backpressure, retry and
/// dead-letter demonstrations.
#[derive(Debug, Default, Clone)]
pub struct SimulatedExecutor;

impl SimulatedExecutor {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl JobExecutor for SimulatedExecutor {
    async fn execute(&self, payload: &JobPayload) -> Result<String, JobQueueError> {
        if payload.duration_ms > 0 {
            tokio::time::sleep(Duration::from_millis(payload.duration_ms)).await;
        }

        if payload.fail_always {
            tracing::debug!(job = %payload.name, "simulated failure");
            return Err(JobQueueError::ExecutionFailed(format!(
                "simulated failure in {}",
                payload.name
            )));
        }

        Ok(format!(
            "simulated {} ms of work for {}",
            payload.duration_ms, payload.name
        ))
    }
}
