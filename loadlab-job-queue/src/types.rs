//! Core types for the job processing engine.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Description of the simulated work a job performs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobPayload {
    /// Human-readable task name.
    #[serde(default = "default_name")]
    pub name: String,
    /// How long the simulated work takes, in milliseconds.
    #[serde(default = "default_duration_ms")]
    pub duration_ms: u64,
    /// Poison flag: the job deterministically fails every attempt.
    #[serde(default)]
    pub fail_always: bool,
}

fn default_name() -> String {
    "task".to_string()
}

const fn default_duration_ms() -> u64 {
    1000
}

impl Default for JobPayload {
    fn default() -> Self {
        Self {
            name: default_name(),
            duration_ms: default_duration_ms(),
            fail_always: false,
        }
    }
}

impl JobPayload {
    #[inline]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// Lifecycle state of a job.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum JobState {
    /// Waiting in the live queue.
    Queued,
    /// Held by exactly one worker.
    Processing,
    /// Finished successfully.
    Completed,
    /// Failed a retriable attempt; waiting out the backoff before re-entering the queue.
    Failed,
    /// Exhausted the retry budget; parked until an operator retries or clears it.
    DeadLettered,
}

impl JobState {
    /// Returns true if this state represents a terminal state.
    #[inline]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::DeadLettered)
    }
}

impl std::fmt::Display for JobState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Queued => "queued",
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::DeadLettered => "dead_lettered",
        })
    }
}

/// A tracked unit of work and its mutable state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    pub id: Uuid,
    pub payload: JobPayload,
    pub state: JobState,
    /// Execution attempts so far; incremented each time a worker picks the job up.
    pub attempts: u32,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub last_attempt_at: Option<chrono::DateTime<chrono::Utc>>,
    pub result: Option<String>,
    pub error: Option<String>,
}

impl Job {
    /// Create a freshly submitted job in the `Queued` state.
    #[inline]
    pub fn new(payload: JobPayload) -> Self {
        Self {
            id: Uuid::new_v4(),
            payload,
            state: JobState::Queued,
            attempts: 0,
            created_at: chrono::Utc::now(),
            last_attempt_at: None,
            result: None,
            error: None,
        }
    }

    /// Mark the job as picked up by a worker, counting the attempt.
    #[inline]
    pub fn begin_attempt(&mut self) {
        self.state = JobState::Processing;
        self.attempts += 1;
        self.last_attempt_at = Some(chrono::Utc::now());
    }

    /// Mark the job as completed with its result.
    #[inline]
    pub fn complete(&mut self, result: impl Into<String>) {
        self.state = JobState::Completed;
        self.result = Some(result.into());
        self.error = None;
    }

    /// Record a failed attempt; the retry manager decides where it goes next.
    #[inline]
    pub fn fail(&mut self, message: impl Into<String>) {
        self.state = JobState::Failed;
        self.error = Some(message.into());
    }
}

/// Outcome of an admission decision at submission time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SubmitOutcome {
    /// The job was appended to the live queue.
    Accepted {
        job_id: Uuid,
        /// 1-based position in the queue at the instant of admission.
        position: usize,
    },
    /// Backpressure: the queue was at capacity and the job was not enqueued.
    Rejected { reason: String },
}

impl SubmitOutcome {
    #[inline]
    pub const fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted { .. })
    }
}

/// Point-in-time view of one worker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerSnapshot {
    pub id: String,
    pub status: WorkerStatus,
    pub jobs_processed: u64,
}

/// What a worker is doing right now.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum WorkerStatus {
    Idle,
    Processing,
}

impl std::fmt::Display for WorkerStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Idle => "idle",
            Self::Processing => "processing",
        })
    }
}

/// Per-state job counts for the queue status view.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct StateCounts {
    pub queued: usize,
    pub processing: usize,
    pub completed: usize,
    pub failed: usize,
    pub dead_lettered: usize,
}
