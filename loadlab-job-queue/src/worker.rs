//! Worker pool: a configurable set of concurrent executors over one queue.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;

use crate::engine::EngineCore;
use crate::types::{WorkerSnapshot, WorkerStatus};

/// Outcome of a `start` call.
#[derive(Debug, Clone, Copy)]
pub struct StartOutcome {
    pub worker_count: usize,
    /// True when the pool was already running and the call was a no-op.
    pub already_running: bool,
}

/// Bookkeeping shared between a worker task and pool snapshots.
pub(crate) struct WorkerSlot {
    id: String,
    busy: AtomicBool,
    jobs_processed: AtomicU64,
}

impl WorkerSlot {
    fn new(index: usize) -> Self {
        Self {
            id: format!("worker-{index}"),
            busy: AtomicBool::new(false),
            jobs_processed: AtomicU64::new(0),
        }
    }

    #[inline]
    pub(crate) fn id(&self) -> &str {
        &self.id
    }

    #[inline]
    pub(crate) fn set_busy(&self, busy: bool) {
        self.busy.store(busy, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_processed(&self) {
        self.jobs_processed.fetch_add(1, Ordering::Relaxed);
    }

    fn snapshot(&self) -> WorkerSnapshot {
        WorkerSnapshot {
            id: self.id.clone(),
            status: if self.busy.load(Ordering::Relaxed) {
                WorkerStatus::Processing
            } else {
                WorkerStatus::Idle
            },
            jobs_processed: self.jobs_processed.load(Ordering::Relaxed),
        }
    }
}

struct WorkerHandle {
    slot: Arc<WorkerSlot>,
    join: JoinHandle<()>,
}

#[derive(Default)]
struct PoolInner {
    workers: Vec<WorkerHandle>,
    shutdown: Option<watch::Sender<bool>>,
}

/// Pool of concurrent workers pulling from the engine's bounded queue.
///
/// Each worker runs one job to completion before pulling again; concurrency
/// comes only from pool width. Stop is cooperative: the shutdown signal is
/// observed only between jobs, never mid-execution.
#[derive(Default)]
pub struct WorkerPool {
    inner: Mutex<PoolInner>,
}

impl WorkerPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spin up `count` workers. No-op while already running.
    pub async fn start(&self, count: usize, core: Arc<EngineCore>) -> StartOutcome {
        let mut inner = self.inner.lock().await;
        if inner.shutdown.is_some() {
            return StartOutcome {
                worker_count: inner.workers.len(),
                already_running: true,
            };
        }

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let mut workers = Vec::with_capacity(count);
        for index in 0..count {
            let slot = Arc::new(WorkerSlot::new(index));
            let join = tokio::spawn(worker_loop(
                Arc::clone(&core),
                Arc::clone(&slot),
                shutdown_rx.clone(),
            ));
            workers.push(WorkerHandle { slot, join });
        }
        inner.workers = workers;
        inner.shutdown = Some(shutdown_tx);
        tracing::info!(worker_count = count, "worker pool started");

        StartOutcome {
            worker_count: count,
            already_running: false,
        }
    }

    /// Signal all workers to finish their current job and exit, then wait
    /// for them. No-op on a stopped pool; returns whether it was running.
    pub async fn stop(&self) -> bool {
        let mut inner = self.inner.lock().await;
        let Some(shutdown) = inner.shutdown.take() else {
            return false;
        };
        let _ = shutdown.send(true);
        for worker in inner.workers.drain(..) {
            let _ = worker.join.await;
        }
        tracing::info!("worker pool stopped");
        true
    }

    pub async fn is_running(&self) -> bool {
        self.inner.lock().await.shutdown.is_some()
    }

    /// Snapshot every worker's id, status and lifetime counter.
    pub async fn status(&self) -> (bool, Vec<WorkerSnapshot>) {
        let inner = self.inner.lock().await;
        let running = inner.shutdown.is_some();
        let workers = inner.workers.iter().map(|w| w.slot.snapshot()).collect();
        (running, workers)
    }
}

/// One worker's execution cycle: dequeue, run to completion, repeat.
async fn worker_loop(
    core: Arc<EngineCore>,
    slot: Arc<WorkerSlot>,
    mut shutdown: watch::Receiver<bool>,
) {
    tracing::debug!(worker = slot.id(), "worker started");
    loop {
        if *shutdown.borrow() {
            break;
        }
        let job_id = tokio::select! {
            _ = shutdown.changed() => continue,
            job_id = core.queue.pop_wait() => job_id,
        };
        core.process_one(&slot, job_id).await;
    }
    tracing::debug!(worker = slot.id(), "worker exiting");
}
