//! Job executor trait: the seam between the worker pool and the actual work.

use async_trait::async_trait;

use crate::error::JobQueueError;
use crate::types::JobPayload;

/// Trait for implementing the work a job performs.
///
/// The worker pool dequeues jobs and hands their payloads to an executor;
/// everything else (state transitions, retries, dead-lettering) is handled
/// by the engine. On success the returned string is stored as the job's
/// result.
#[async_trait]
pub trait JobExecutor: Send + Sync {
    /// Execute the work described by the payload.
    async fn execute(&self, payload: &JobPayload) -> Result<String, JobQueueError>;
}

/// An executor that completes every job immediately.
///
/// Useful for tests and for wiring the engine together before a real
/// workload exists.
#[derive(Debug, Default, Clone)]
pub struct NoOpExecutor;

#[async_trait]
impl JobExecutor for NoOpExecutor {
    async fn execute(&self, payload: &JobPayload) -> Result<String, JobQueueError> {
        Ok(format!("no-op: {}", payload.name))
    }
}
