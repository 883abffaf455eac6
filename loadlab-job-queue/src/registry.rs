//! Id → job lookup with insertion order and bounded retention.

use std::collections::{HashMap, VecDeque};

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::types::{Job, JobState, StateCounts};

/// Maximum number of job records to keep in memory.
const MAX_TRACKED_JOBS: usize = 1000;

/// Internal storage optimized for both iteration and lookup by id.
#[derive(Debug, Default)]
struct RegistryState {
    /// Job ids in insertion order (oldest first).
    order: VecDeque<Uuid>,
    /// Map from id to job record for O(1) lookup.
    jobs: HashMap<Uuid, Job>,
}

impl RegistryState {
    fn insert(&mut self, job: Job) {
        let id = job.id;
        self.jobs.insert(id, job);
        self.order.push_back(id);
        self.trim();
    }

    /// Prune the oldest terminal records past the cap. Live and
    /// dead-lettered jobs are never pruned.
    fn trim(&mut self) {
        if self.order.len() <= MAX_TRACKED_JOBS {
            return;
        }
        let mut excess = self.order.len() - MAX_TRACKED_JOBS;
        let mut idx = 0;
        while excess > 0 && idx < self.order.len() {
            let id = self.order[idx];
            let completed = self
                .jobs
                .get(&id)
                .map(|j| j.state == JobState::Completed)
                .unwrap_or(true);
            if completed {
                self.order.remove(idx);
                self.jobs.remove(&id);
                excess -= 1;
            } else {
                idx += 1;
            }
        }
    }
}

/// Status registry: the single owner of all job records.
///
/// Workers mutate a job only through [`JobRegistry::with_mut`], which grants
/// exclusive access for the duration of the closure.
#[derive(Debug, Default)]
pub struct JobRegistry {
    state: RwLock<RegistryState>,
}

impl JobRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Track a new job record.
    pub async fn insert(&self, job: Job) {
        self.state.write().await.insert(job);
    }

    /// Snapshot of a job by id.
    pub async fn get(&self, id: Uuid) -> Option<Job> {
        self.state.read().await.jobs.get(&id).cloned()
    }

    /// Whether a job is currently tracked.
    pub async fn contains(&self, id: Uuid) -> bool {
        self.state.read().await.jobs.contains_key(&id)
    }

    /// Mutate a job under exclusive access, returning the closure's result.
    pub async fn with_mut<R>(&self, id: Uuid, f: impl FnOnce(&mut Job) -> R) -> Option<R> {
        let mut state = self.state.write().await;
        state.jobs.get_mut(&id).map(f)
    }

    /// Remove a job record entirely.
    pub async fn remove(&self, id: Uuid) -> Option<Job> {
        let mut state = self.state.write().await;
        state.order.retain(|other| *other != id);
        state.jobs.remove(&id)
    }

    /// Snapshots of the given ids, in the given order, skipping unknown ids.
    pub async fn get_many(&self, ids: &[Uuid]) -> Vec<Job> {
        let state = self.state.read().await;
        ids.iter()
            .filter_map(|id| state.jobs.get(id).cloned())
            .collect()
    }

    /// Count jobs per lifecycle state.
    pub async fn counts(&self) -> StateCounts {
        let state = self.state.read().await;
        let mut counts = StateCounts::default();
        for job in state.jobs.values() {
            match job.state {
                JobState::Queued => counts.queued += 1,
                JobState::Processing => counts.processing += 1,
                JobState::Completed => counts.completed += 1,
                JobState::Failed => counts.failed += 1,
                JobState::DeadLettered => counts.dead_lettered += 1,
            }
        }
        counts
    }

    /// Total tracked records.
    pub async fn len(&self) -> usize {
        self.state.read().await.jobs.len()
    }

    /// Forget every record.
    pub async fn clear(&self) {
        let mut state = self.state.write().await;
        state.order.clear();
        state.jobs.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::JobPayload;

    #[tokio::test]
    async fn insert_get_and_mutate() {
        let registry = JobRegistry::new();
        let job = Job::new(JobPayload::named("alpha"));
        let id = job.id;
        registry.insert(job).await;

        assert!(registry.contains(id).await);
        let attempts = registry
            .with_mut(id, |job| {
                job.begin_attempt();
                job.attempts
            })
            .await;
        assert_eq!(attempts, Some(1));
        let job = registry.get(id).await.expect("job tracked");
        assert_eq!(job.state, JobState::Processing);
        assert!(job.last_attempt_at.is_some());
    }

    #[tokio::test]
    async fn trim_only_prunes_completed_records() {
        let registry = JobRegistry::new();
        // One live job first, then enough completed ones to exceed the cap.
        let live = Job::new(JobPayload::named("live"));
        let live_id = live.id;
        registry.insert(live).await;
        for i in 0..MAX_TRACKED_JOBS {
            let mut job = Job::new(JobPayload::named(format!("done-{i}")));
            job.complete("ok");
            registry.insert(job).await;
        }
        assert_eq!(registry.len().await, MAX_TRACKED_JOBS);
        assert!(registry.contains(live_id).await);
    }
}
