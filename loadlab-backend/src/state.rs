use loadlab_job_queue::JobEngine;

/// Shared application state passed to every route handler.
#[derive(Clone)]
pub struct AppState {
    pub engine: JobEngine,
    /// Workers started when a start request names no count.
    pub default_worker_count: usize,
}

impl AppState {
    /// Build a fully initialised state container from its constituent parts.
    pub fn new(engine: JobEngine, default_worker_count: usize) -> Self {
        Self {
            engine,
            default_worker_count,
        }
    }
}
