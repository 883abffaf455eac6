//! Dead-letter store for jobs that exhausted their retry budget.

use std::collections::VecDeque;

use tokio::sync::Mutex;
use uuid::Uuid;

/// Holding area for poison jobs, ordered by arrival.
///
/// Jobs only leave through the explicit operator operations on the engine
/// (`dlq_retry`, `dlq_clear`); nothing here is automatic.
#[derive(Debug, Default)]
pub struct DeadLetterStore {
    inner: Mutex<VecDeque<Uuid>>,
}

impl DeadLetterStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Park a job id.
    pub async fn push(&self, id: Uuid) {
        self.inner.lock().await.push_back(id);
    }

    /// Remove a specific id; returns whether it was held.
    pub async fn remove(&self, id: Uuid) -> bool {
        let mut held = self.inner.lock().await;
        let before = held.len();
        held.retain(|other| *other != id);
        held.len() != before
    }

    /// Ids currently held, oldest first.
    pub async fn ids(&self) -> Vec<Uuid> {
        self.inner.lock().await.iter().copied().collect()
    }

    pub async fn len(&self) -> usize {
        self.inner.lock().await.len()
    }

    /// Drop every held id, returning how many were removed.
    pub async fn clear(&self) -> usize {
        let mut held = self.inner.lock().await;
        let removed = held.len();
        held.clear();
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn push_remove_clear() {
        let dlq = DeadLetterStore::new();
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        dlq.push(a).await;
        dlq.push(b).await;
        assert_eq!(dlq.ids().await, vec![a, b]);

        assert!(dlq.remove(a).await);
        assert!(!dlq.remove(a).await);
        assert_eq!(dlq.len().await, 1);

        assert_eq!(dlq.clear().await, 1);
        assert_eq!(dlq.len().await, 0);
    }
}
