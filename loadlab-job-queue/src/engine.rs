//! Engine facade: submission, status views, retry policy and reset.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use uuid::Uuid;

use crate::dlq::DeadLetterStore;
use crate::error::JobQueueError;
use crate::executor::JobExecutor;
use crate::queue::BoundedQueue;
use crate::registry::JobRegistry;
use crate::stats::{Stats, StatsSnapshot};
use crate::types::{Job, JobPayload, JobState, StateCounts, SubmitOutcome, WorkerSnapshot};
use crate::worker::{StartOutcome, WorkerPool, WorkerSlot};

/// Engine-wide tuning knobs.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Maximum live queue depth; submissions beyond it are rejected.
    pub max_queue_size: usize,
    /// Retry budget per job; at or beyond it a failing job is dead-lettered.
    pub max_attempts: u32,
    /// Fixed delay before a failed job re-enters the queue. Deliberately
    /// non-exponential; retries must not re-submit synchronously.
    pub retry_backoff: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_queue_size: 10,
            max_attempts: 3,
            retry_backoff: Duration::from_millis(300),
        }
    }
}

/// Snapshot returned by [`JobEngine::queue_status`].
#[derive(Debug, Clone, Serialize)]
pub struct QueueStatus {
    pub queue_depth: usize,
    pub max_queue_size: usize,
    pub counts: StateCounts,
    pub stats: StatsSnapshot,
}

/// Snapshot returned by [`JobEngine::workers_status`].
#[derive(Debug, Clone, Serialize)]
pub struct PoolStatus {
    pub running: bool,
    pub workers: Vec<WorkerSnapshot>,
    pub queue_depth: usize,
    pub stats: StatsSnapshot,
}

/// Shared engine internals: each component is owned by exactly one guard and
/// never mutated directly by two components.
pub struct EngineCore {
    pub(crate) config: EngineConfig,
    pub(crate) queue: BoundedQueue,
    pub(crate) registry: JobRegistry,
    pub(crate) dlq: DeadLetterStore,
    pub(crate) stats: Stats,
    pub(crate) executor: Arc<dyn JobExecutor>,
}

impl EngineCore {
    /// Run one dequeued job to completion or failed hand-off.
    ///
    /// The worker holds the job exclusively between here and the terminal
    /// registry update; nothing else mutates it meanwhile.
    pub(crate) async fn process_one(self: &Arc<Self>, slot: &WorkerSlot, id: Uuid) {
        let payload = self
            .registry
            .with_mut(id, |job| {
                job.begin_attempt();
                job.payload.clone()
            })
            .await;
        // The record can vanish when a reset races the dequeue; skip the id.
        let Some(payload) = payload else {
            return;
        };

        slot.set_busy(true);
        tracing::debug!(worker = slot.id(), job_id = %id, job = %payload.name, "processing job");
        match self.executor.execute(&payload).await {
            Ok(result) => {
                self.registry.with_mut(id, |job| job.complete(result)).await;
                // Worker-local counter first: once jobs_completed reaches a
                // total, every per-worker count is already in place.
                slot.record_processed();
                self.stats.record_completed();
                tracing::debug!(worker = slot.id(), job_id = %id, "job completed");
            }
            Err(err) => self.handle_failure(id, err.to_string()).await,
        }
        slot.set_busy(false);
    }

    /// Retry/dead-letter policy: compare attempts to the budget and either
    /// schedule a backed-off re-enqueue or park the job in the DLQ.
    async fn handle_failure(self: &Arc<Self>, id: Uuid, error: String) {
        let attempts = self
            .registry
            .with_mut(id, |job| {
                job.fail(&error);
                job.attempts
            })
            .await;
        let Some(attempts) = attempts else {
            return;
        };

        if attempts >= self.config.max_attempts {
            self.registry
                .with_mut(id, |job| job.state = JobState::DeadLettered)
                .await;
            self.dlq.push(id).await;
            self.stats.record_failed();
            tracing::warn!(job_id = %id, attempts, %error, "retry budget exhausted, job dead-lettered");
        } else {
            tracing::debug!(
                job_id = %id,
                attempts,
                backoff_ms = self.config.retry_backoff.as_millis() as u64,
                "job failed, scheduling retry"
            );
            let core = Arc::clone(self);
            tokio::spawn(async move { core.resubmit_after_backoff(id).await });
        }
    }

    /// Detached retry path. An automatic retry is never dropped: when the
    /// queue is full the backoff is re-applied until admission succeeds. The
    /// task bails out once the record is gone (a reset ran).
    async fn resubmit_after_backoff(self: Arc<Self>, id: Uuid) {
        loop {
            tokio::time::sleep(self.config.retry_backoff).await;
            if !self.registry.contains(id).await {
                return;
            }
            self.registry
                .with_mut(id, |job| job.state = JobState::Queued)
                .await;
            match self.queue.try_push(id).await {
                Ok(_) => {
                    // Reset clears the registry before the queue; if the
                    // record disappeared underneath the push, take the
                    // orphan id back out.
                    if !self.registry.contains(id).await {
                        self.queue.remove(id).await;
                        return;
                    }
                    tracing::debug!(job_id = %id, "job re-queued after backoff");
                    return;
                }
                Err(_) => {
                    self.registry
                        .with_mut(id, |job| job.state = JobState::Failed)
                        .await;
                }
            }
        }
    }
}

/// Handle to the job processing engine.
///
/// Cheap to clone; all clones share the same queue, registry, dead-letter
/// store, stats and worker pool.
#[derive(Clone)]
pub struct JobEngine {
    core: Arc<EngineCore>,
    pool: Arc<WorkerPool>,
}

impl JobEngine {
    pub fn new(config: EngineConfig, executor: Arc<dyn JobExecutor>) -> Self {
        let core = EngineCore {
            queue: BoundedQueue::new(config.max_queue_size),
            registry: JobRegistry::new(),
            dlq: DeadLetterStore::new(),
            stats: Stats::new(),
            executor,
            config,
        };
        Self {
            core: Arc::new(core),
            pool: Arc::new(WorkerPool::new()),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.core.config
    }

    /// Submit a job. Admission control happens here: a full queue rejects
    /// the job synchronously and nothing is enqueued.
    pub async fn submit(&self, payload: JobPayload) -> SubmitOutcome {
        let job = Job::new(payload);
        let id = job.id;
        // Insert before push so a worker that dequeues immediately finds
        // the record.
        self.core.registry.insert(job).await;
        match self.core.queue.try_push(id).await {
            Ok(position) => {
                self.core.stats.record_submitted();
                tracing::debug!(job_id = %id, position, "job queued");
                SubmitOutcome::Accepted {
                    job_id: id,
                    position,
                }
            }
            Err(full) => {
                self.core.registry.remove(id).await;
                self.core.stats.record_rejection();
                tracing::debug!(job_id = %id, depth = full.depth, "submission rejected, queue full");
                SubmitOutcome::Rejected {
                    reason: "queue full".to_string(),
                }
            }
        }
    }

    /// Snapshot of a tracked job.
    pub async fn job(&self, id: Uuid) -> Option<Job> {
        self.core.registry.get(id).await
    }

    pub async fn queue_depth(&self) -> usize {
        self.core.queue.depth().await
    }

    pub fn max_queue_size(&self) -> usize {
        self.core.queue.capacity()
    }

    pub async fn stats(&self) -> StatsSnapshot {
        self.core.stats.snapshot()
    }

    pub async fn queue_status(&self) -> QueueStatus {
        QueueStatus {
            queue_depth: self.core.queue.depth().await,
            max_queue_size: self.core.queue.capacity(),
            counts: self.core.registry.counts().await,
            stats: self.core.stats.snapshot(),
        }
    }

    /// Start `count` workers; a no-op while the pool is already running.
    pub async fn start_workers(&self, count: usize) -> StartOutcome {
        self.pool.start(count, Arc::clone(&self.core)).await
    }

    /// Cooperatively stop the pool, waiting for in-flight jobs to finish.
    pub async fn stop_workers(&self) -> bool {
        self.pool.stop().await
    }

    pub async fn workers_running(&self) -> bool {
        self.pool.is_running().await
    }

    pub async fn workers_status(&self) -> PoolStatus {
        let (running, workers) = self.pool.status().await;
        PoolStatus {
            running,
            workers,
            queue_depth: self.core.queue.depth().await,
            stats: self.core.stats.snapshot(),
        }
    }

    /// Jobs currently parked in the dead-letter store, oldest first.
    pub async fn dlq_list(&self) -> Vec<Job> {
        let ids = self.core.dlq.ids().await;
        self.core.registry.get_many(&ids).await
    }

    pub async fn dlq_len(&self) -> usize {
        self.core.dlq.len().await
    }

    /// Operator retry of a dead-lettered job: attempts reset to zero and the
    /// job is resubmitted through normal admission control. A full queue can
    /// reject the retry, in which case the job stays dead-lettered.
    pub async fn dlq_retry(&self, id: Uuid) -> Result<SubmitOutcome, JobQueueError> {
        if !self.core.registry.contains(id).await {
            return Err(JobQueueError::NotFound(id));
        }
        if !self.core.dlq.remove(id).await {
            return Err(JobQueueError::NotDeadLettered(id));
        }
        let prior_attempts = self
            .core
            .registry
            .with_mut(id, |job| {
                let prior = job.attempts;
                job.attempts = 0;
                job.error = None;
                job.state = JobState::Queued;
                prior
            })
            .await
            .unwrap_or(0);

        match self.core.queue.try_push(id).await {
            Ok(position) => {
                tracing::info!(job_id = %id, "dead-lettered job re-queued by operator");
                Ok(SubmitOutcome::Accepted {
                    job_id: id,
                    position,
                })
            }
            Err(_) => {
                self.core
                    .registry
                    .with_mut(id, |job| {
                        job.attempts = prior_attempts;
                        job.state = JobState::DeadLettered;
                    })
                    .await;
                self.core.dlq.push(id).await;
                self.core.stats.record_rejection();
                Ok(SubmitOutcome::Rejected {
                    reason: "queue full".to_string(),
                })
            }
        }
    }

    /// Empty the dead-letter store unconditionally, dropping the records.
    pub async fn dlq_clear(&self) -> usize {
        let ids = self.core.dlq.ids().await;
        for id in &ids {
            self.core.registry.remove(*id).await;
        }
        let removed = self.core.dlq.clear().await;
        if removed > 0 {
            tracing::info!(removed, "dead-letter store cleared");
        }
        removed
    }

    pub async fn tracked_jobs(&self) -> usize {
        self.core.registry.len().await
    }

    /// Return the whole subsystem to its initial empty, idle condition.
    ///
    /// Stops the pool (in-flight jobs finish first), then clears the
    /// registry before the queue so stray retry tasks see the records gone
    /// and withdraw.
    pub async fn reset(&self) {
        self.pool.stop().await;
        self.core.registry.clear().await;
        self.core.queue.clear().await;
        self.core.dlq.clear().await;
        self.core.stats.reset();
        tracing::info!("engine reset to initial state");
    }
}
