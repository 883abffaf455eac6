//! Bounded FIFO queue with admission control.

use std::collections::VecDeque;

use tokio::sync::{Mutex, Notify};
use uuid::Uuid;

/// Admission failure returned when the queue is at capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueueFull {
    pub depth: usize,
    pub capacity: usize,
}

/// Fixed-capacity FIFO queue of job ids.
///
/// The capacity check and the append happen under a single lock acquisition,
/// so concurrent submitters can never both observe free capacity and
/// overflow the bound. This queue is the sole authority on backpressure.
pub struct BoundedQueue {
    inner: Mutex<VecDeque<Uuid>>,
    notify: Notify,
    capacity: usize,
}

impl BoundedQueue {
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Mutex::new(VecDeque::with_capacity(capacity)),
            notify: Notify::new(),
            capacity,
        }
    }

    #[inline]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Append a job id, enforcing the depth bound atomically.
    ///
    /// Returns the job's 1-based queue position on admission.
    pub async fn try_push(&self, id: Uuid) -> Result<usize, QueueFull> {
        let mut queue = self.inner.lock().await;
        if queue.len() >= self.capacity {
            return Err(QueueFull {
                depth: queue.len(),
                capacity: self.capacity,
            });
        }
        queue.push_back(id);
        let position = queue.len();
        drop(queue);
        // One wakeup per enqueued job; Notify stores the permit if no worker
        // is currently waiting.
        self.notify.notify_one();
        Ok(position)
    }

    /// Take the longest-waiting job id, if any.
    pub async fn pop(&self) -> Option<Uuid> {
        self.inner.lock().await.pop_front()
    }

    /// Take the longest-waiting job id, suspending until one is available.
    pub async fn pop_wait(&self) -> Uuid {
        loop {
            if let Some(id) = self.pop().await {
                return id;
            }
            self.notify.notified().await;
        }
    }

    /// Remove a specific id wherever it sits; returns whether it was queued.
    pub async fn remove(&self, id: Uuid) -> bool {
        let mut queue = self.inner.lock().await;
        let before = queue.len();
        queue.retain(|other| *other != id);
        queue.len() != before
    }

    /// Current queue depth.
    pub async fn depth(&self) -> usize {
        self.inner.lock().await.len()
    }

    /// Drop all queued ids, returning how many were removed.
    pub async fn clear(&self) -> usize {
        let mut queue = self.inner.lock().await;
        let removed = queue.len();
        queue.clear();
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn push_reports_position_and_enforces_capacity() {
        let q = BoundedQueue::new(2);
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        assert_eq!(q.try_push(a).await, Ok(1));
        assert_eq!(q.try_push(b).await, Ok(2));
        let err = q.try_push(Uuid::new_v4()).await.unwrap_err();
        assert_eq!(err.depth, 2);
        assert_eq!(err.capacity, 2);
        assert_eq!(q.depth().await, 2);
    }

    #[tokio::test]
    async fn pop_is_fifo() {
        let q = BoundedQueue::new(4);
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        q.try_push(a).await.unwrap();
        q.try_push(b).await.unwrap();
        assert_eq!(q.pop().await, Some(a));
        assert_eq!(q.pop().await, Some(b));
        assert_eq!(q.pop().await, None);
    }

    #[tokio::test]
    async fn pop_wait_wakes_on_push() {
        let q = std::sync::Arc::new(BoundedQueue::new(1));
        let waiter = {
            let q = q.clone();
            tokio::spawn(async move { q.pop_wait().await })
        };
        // Give the waiter a chance to park before pushing.
        tokio::time::sleep(Duration::from_millis(20)).await;
        let id = Uuid::new_v4();
        q.try_push(id).await.unwrap();
        let popped = tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .expect("pop_wait should wake")
            .expect("waiter task");
        assert_eq!(popped, id);
    }

    #[tokio::test]
    async fn clear_empties_the_queue() {
        let q = BoundedQueue::new(3);
        q.try_push(Uuid::new_v4()).await.unwrap();
        q.try_push(Uuid::new_v4()).await.unwrap();
        assert_eq!(q.clear().await, 2);
        assert_eq!(q.depth().await, 0);
    }
}
