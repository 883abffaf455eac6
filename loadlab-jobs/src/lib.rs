//! Concrete job executors for the loadlab backend.
//!
//! This crate provides implementations of the
//! [`JobExecutor`](loadlab_job_queue::JobExecutor) trait for the workloads
//! the demo engine runs.

mod simulate;

pub use simulate::SimulatedExecutor;
