//! # Event Bus
//!
//! Bounded, monotonically-sequenced log of campaign events, queryable by
//! "everything after sequence N". Publishing assigns ids and timestamps
//! under a single lock and never blocks on consumers; retention is a ring
//! buffer whose oldest entries are evicted past capacity — a documented
//! lossy boundary for consumers that poll too slowly. Push broadcast to
//! display clients is handled separately and is independent of retention.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

/// Kind of a published event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    /// A dial-phase transition for the item in progress
    Progress,
    /// An operator control action and its outcome
    Action,
    /// A dataset accepted at ingress
    Dataset,
}

/// One retained event. Created only by [`EventBus::publish`]; immutable.
#[derive(Debug, Clone, Serialize)]
pub struct Event {
    /// Strictly increasing publish-order id, never reused
    pub sequence_id: u64,
    /// Publish time
    pub timestamp: DateTime<Utc>,
    /// Event kind
    pub kind: EventKind,
    /// Kind-specific payload
    pub payload: serde_json::Value,
}

/// Result of an incremental query.
#[derive(Debug, Clone, Serialize)]
pub struct EventPage {
    /// Retained events with `sequence_id > since`, oldest first
    pub events: Vec<Event>,
    /// Highest retained sequence id, or the caller's `since` when nothing
    /// is retained; feed this back as the next `since` bookmark
    pub last_id: u64,
}

struct BusInner {
    next_seq: u64,
    buffer: VecDeque<Event>,
}

/// Bounded, sequenced event log.
pub struct EventBus {
    inner: Mutex<BusInner>,
    capacity: usize,
}

impl EventBus {
    /// Create a bus retaining at most `capacity` events.
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Mutex::new(BusInner {
                next_seq: 0,
                buffer: VecDeque::with_capacity(capacity.min(1024)),
            }),
            capacity,
        }
    }

    /// Assign the next sequence id, timestamp the payload, and retain it.
    ///
    /// Evicts the oldest event when the buffer is at capacity. Returns the
    /// stored event.
    pub fn publish(&self, kind: EventKind, payload: serde_json::Value) -> Event {
        let mut inner = self.inner.lock();
        inner.next_seq += 1;
        let event = Event {
            sequence_id: inner.next_seq,
            timestamp: Utc::now(),
            kind,
            payload,
        };
        if inner.buffer.len() == self.capacity {
            inner.buffer.pop_front();
        }
        inner.buffer.push_back(event.clone());
        event
    }

    /// Every retained event with `sequence_id > since`, plus the bookmark
    /// for the caller's next poll.
    pub fn query(&self, since: u64) -> EventPage {
        let inner = self.inner.lock();
        let events: Vec<Event> = inner
            .buffer
            .iter()
            .filter(|e| e.sequence_id > since)
            .cloned()
            .collect();
        let last_id = inner.buffer.back().map(|e| e.sequence_id).unwrap_or(since);
        EventPage { events, last_id }
    }

    /// Highest sequence id ever assigned (0 before the first publish).
    pub fn latest_id(&self) -> u64 {
        self.inner.lock().next_seq
    }
}
