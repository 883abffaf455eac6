//! Error types for the job processing engine.

use thiserror::Error;
use uuid::Uuid;

/// Errors that may occur while interacting with the job engine.
#[derive(Debug, Error)]
pub enum JobQueueError {
    #[error("job not found: {0}")]
    NotFound(Uuid),

    #[error("job is not in the dead-letter store: {0}")]
    NotDeadLettered(Uuid),

    #[error("job execution failed: {0}")]
    ExecutionFailed(String),
}
