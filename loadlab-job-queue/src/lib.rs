//! Bounded job queue, worker pool and dead-letter handling.
//!
//! This crate is an in-memory job processing engine built to demonstrate
//! background work under load: callers submit jobs through admission control
//! (a full queue rejects rather than grows), a pool of concurrent workers
//! drains the queue in FIFO order, failed jobs are retried with a fixed
//! backoff up to a budget, and jobs that exhaust the budget are parked in a
//! dead-letter store until an operator retries or clears them.
//!
//! # Architecture
//!
//! - [`JobEngine`] - The main interface for submitting and tracking jobs
//! - [`JobExecutor`] - Trait for implementing the actual work
//! - [`Job`] / [`JobState`] - A tracked unit of work and its lifecycle
//! - [`SubmitOutcome`] - The admission decision returned at submission time
//!
//! # Example
//!
//! ```rust,no_run
//! use loadlab_job_queue::{EngineConfig, JobEngine, JobPayload, NoOpExecutor};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() {
//!     let engine = JobEngine::new(EngineConfig::default(), Arc::new(NoOpExecutor));
//!     engine.start_workers(3).await;
//!
//!     let outcome = engine.submit(JobPayload::named("demo")).await;
//!     println!("submitted: {:?}", outcome);
//! }
//! ```

mod dlq;
mod engine;
mod error;
mod executor;
mod queue;
mod registry;
mod stats;
mod types;
mod worker;

pub use engine::{EngineConfig, JobEngine, PoolStatus, QueueStatus};
pub use error::JobQueueError;
pub use executor::{JobExecutor, NoOpExecutor};
pub use stats::{Stats, StatsSnapshot};
pub use types::{
    Job, JobPayload, JobState, StateCounts, SubmitOutcome, WorkerSnapshot, WorkerStatus,
};
pub use worker::StartOutcome;

// Re-export async_trait for convenience when implementing JobExecutor
pub use async_trait::async_trait;
