//! # Dial Queue
//!
//! Unbounded FIFO of contact records awaiting processing. Enqueueing never
//! blocks and never rejects; the worker loop waits on [`DialQueue::dequeue_timeout`]
//! with a bounded interval so stop and pause signals stay responsive.
//! FIFO order is the only ordering guarantee.

use std::collections::VecDeque;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::Notify;

use crate::contact::QueuedContact;

/// Unbounded FIFO work queue for contact records.
///
/// Internally a mutex-guarded deque plus a [`Notify`] that wakes the worker
/// when an item arrives. The lock is never held across an await point.
pub struct DialQueue {
    items: Mutex<VecDeque<QueuedContact>>,
    available: Notify,
}

impl DialQueue {
    /// Create an empty queue
    pub fn new() -> Self {
        Self {
            items: Mutex::new(VecDeque::new()),
            available: Notify::new(),
        }
    }

    /// Append an item to the tail. Never blocks, never rejects.
    ///
    /// Returns the queue depth after the append.
    pub fn enqueue(&self, item: QueuedContact) -> usize {
        let depth = {
            let mut items = self.items.lock();
            items.push_back(item);
            items.len()
        };
        self.available.notify_one();
        depth
    }

    /// Current number of queued items
    pub fn depth(&self) -> usize {
        self.items.lock().len()
    }

    /// Remove and return the head item, waiting until one is available.
    pub async fn dequeue(&self) -> QueuedContact {
        loop {
            // Arm the notification before checking, so an enqueue landing
            // between the check and the await is not lost.
            let notified = self.available.notified();
            if let Some(item) = self.items.lock().pop_front() {
                return item;
            }
            notified.await;
        }
    }

    /// Like [`dequeue`](Self::dequeue), but gives up after `wait`.
    ///
    /// The worker loop uses this with its poll interval so a stop request
    /// is observed within that bound even while the queue is empty.
    pub async fn dequeue_timeout(&self, wait: Duration) -> Option<QueuedContact> {
        tokio::time::timeout(wait, self.dequeue()).await.ok()
    }

    /// Atomically remove and discard every queued item.
    ///
    /// Used by the stop path. Returns the number of items removed.
    pub fn drain(&self) -> usize {
        let mut items = self.items.lock();
        let drained = items.len();
        items.clear();
        drained
    }
}

impl Default for DialQueue {
    fn default() -> Self {
        Self::new()
    }
}
