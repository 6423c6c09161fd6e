//! # Client Registry & Broadcaster
//!
//! Tracks display-client base URLs and best-effort pushes event payloads
//! to each of them. Delivery failures silently prune the failing address;
//! registration is the only explicit mutation. Engine correctness never
//! depends on any subscriber's liveness: pushes run in detached tasks and
//! their errors are logged at debug level only.

use std::sync::Arc;
use std::time::Duration;

use dashmap::DashSet;
use tracing::{debug, info};

use crate::config::ClientConfig;

/// Registry of display clients plus the HTTP pusher. Cheap to clone.
#[derive(Clone)]
pub struct Broadcaster {
    clients: Arc<DashSet<String>>,
    http: reqwest::Client,
    receive_path: String,
    push_timeout: Duration,
}

impl Broadcaster {
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            clients: Arc::new(DashSet::new()),
            http: reqwest::Client::new(),
            receive_path: config.receive_path.clone(),
            push_timeout: config.push_timeout,
        }
    }

    /// Add a client base URL (e.g. `http://192.168.88.201:6000`).
    ///
    /// Returns the current registration set, sorted for stable output.
    pub fn register(&self, base_url: String) -> Vec<String> {
        info!("🖥️ display client registered: {}", base_url);
        self.clients.insert(base_url);
        self.registered()
    }

    /// Current registration set, sorted.
    pub fn registered(&self) -> Vec<String> {
        let mut list: Vec<String> = self.clients.iter().map(|c| c.key().clone()).collect();
        list.sort();
        list
    }

    /// Whether any client is registered (used to skip pointless pushes).
    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }

    /// Push `payload` to every registered client, pruning failures.
    ///
    /// Best-effort by design: a non-2xx response still counts as delivered
    /// (the client answered); only transport-level failures prune.
    pub async fn push(&self, payload: serde_json::Value) {
        let targets = self.registered();
        let mut dead = Vec::new();
        for base in targets {
            let url = format!("{}{}", base, self.receive_path);
            let sent = self
                .http
                .post(&url)
                .timeout(self.push_timeout)
                .json(&payload)
                .send()
                .await;
            if let Err(e) = sent {
                debug!("push to {} failed, pruning: {}", base, e);
                dead.push(base);
            }
        }
        for base in dead {
            self.clients.remove(&base);
        }
    }
}
