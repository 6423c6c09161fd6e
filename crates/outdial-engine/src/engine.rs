//! # Campaign Engine
//!
//! Central coordinator for one outbound-calling campaign process: owns the
//! work queue, the control state, the event bus, and the display-client
//! broadcaster, and drives the injected telephony provider from a single
//! background worker task (see [`crate::dialer`]).
//!
//! Ingress-facing operations live here; the per-item dial sequence and the
//! worker loop are `impl CampaignEngine` blocks in the `dialer` module,
//! mirroring how the call phases are documented there.
//!
//! ## Locking
//!
//! Three independently-locked shared resources: the control state, the
//! queue's internal lock, and the event-bus lock. They are never nested;
//! in particular the control lock and the event-bus lock are never held
//! simultaneously.

use std::sync::Arc;

use serde_json::json;
use tracing::info;

use crate::clients::Broadcaster;
use crate::config::CampaignConfig;
use crate::contact::{DatasetSubmission, EnqueueReceipt, QueuedContact};
use crate::control::{ActionReport, ControlAction, ControlState, StatusSnapshot};
use crate::error::{CampaignError, Result};
use crate::events::{Event, EventBus, EventKind, EventPage};
use crate::queue::DialQueue;
use crate::telephony::TelephonyProvider;

/// The campaign orchestration engine. One instance per process.
pub struct CampaignEngine {
    pub(crate) config: CampaignConfig,
    pub(crate) provider: Arc<dyn TelephonyProvider>,
    pub(crate) queue: DialQueue,
    pub(crate) control: ControlState,
    pub(crate) events: EventBus,
    pub(crate) broadcaster: Broadcaster,
}

impl CampaignEngine {
    /// Create an engine around an injected telephony provider.
    ///
    /// Validates the configuration. The worker is not started here; see
    /// [`CampaignServer`](crate::server::CampaignServer) for lifecycle
    /// management.
    pub fn new(
        config: CampaignConfig,
        provider: Arc<dyn TelephonyProvider>,
    ) -> Result<Arc<Self>> {
        config.validate()?;
        info!(
            "🚀 creating campaign engine (event capacity {}, ring timeout {:?})",
            config.events.buffer_capacity, config.dialer.ring_timeout
        );
        Ok(Arc::new(Self {
            broadcaster: Broadcaster::new(&config.clients),
            events: EventBus::new(config.events.buffer_capacity),
            queue: DialQueue::new(),
            control: ControlState::new(),
            provider,
            config,
        }))
    }

    /// Engine configuration
    pub fn config(&self) -> &CampaignConfig {
        &self.config
    }

    /// Accept a dataset: validate, publish the `dataset` event, enqueue.
    ///
    /// Rejections happen synchronously, before anything is enqueued: an
    /// empty item list or a blank credential never changes queue depth.
    pub fn submit_dataset(&self, submission: DatasetSubmission) -> Result<EnqueueReceipt> {
        if submission.items.is_empty() {
            return Err(CampaignError::invalid_input("dataset contains no items"));
        }
        if submission.credential.username.is_empty() || submission.credential.password.is_empty() {
            return Err(CampaignError::invalid_input("dialing credential is missing"));
        }

        // Passwords stay out of the event stream; display clients only
        // need the items and the submitting identity.
        let payload = json!({
            "credential_user": &submission.credential.username,
            "items": &submission.items,
        });
        self.publish(EventKind::Dataset, payload, true);

        let enqueued = submission.items.len();
        let mut queue_depth = 0;
        for contact in submission.items {
            queue_depth = self.queue.enqueue(QueuedContact {
                contact,
                identity: submission.credential.clone(),
            });
        }
        self.control.add_queued(enqueued as u64);
        info!("📥 enqueued {} contacts (queue depth {})", enqueued, queue_depth);

        Ok(EnqueueReceipt {
            enqueued,
            queue_depth,
        })
    }

    /// Apply one operator control action.
    ///
    /// Idempotent-safe: actions whose precondition does not hold report
    /// `applied == false` and change nothing. `stop` is the only action
    /// that interrupts in-flight work: it raises the stop signal, hangs up
    /// every active leg, and drains the queue.
    pub async fn apply_control(&self, action: ControlAction) -> ActionReport {
        let report = match action {
            ControlAction::Call => {
                self.control.begin_dialing();
                ActionReport::applied(action, "dialing started (worker active)")
            }
            ControlAction::Pause => {
                if self.control.pause() {
                    ActionReport::applied(action, "dialing paused")
                } else {
                    ActionReport::not_applicable(action, "dialing has not been started")
                }
            }
            ControlAction::Start => {
                if self.control.resume() {
                    ActionReport::applied(action, "dialing resumed")
                } else {
                    ActionReport::not_applicable(action, "dialing is not paused")
                }
            }
            ControlAction::Stop => {
                self.control.stop();
                if let Err(e) = self.provider.hangup_all().await {
                    tracing::warn!("hangup on stop failed: {}", e);
                }
                let drained = self.queue.drain();
                ActionReport::applied(
                    action,
                    format!("dialing stopped ({drained} queued items discarded)"),
                )
            }
        };

        info!("[ACTION] {} -> {}", action, report.message);
        // Action events are retained for pollers but not pushed to
        // display clients.
        self.publish(
            EventKind::Action,
            json!({ "action": action, "message": &report.message }),
            false,
        );
        report
    }

    /// Control snapshot plus live queue depth.
    pub fn status(&self) -> StatusSnapshot {
        self.control.snapshot(self.queue.depth())
    }

    /// Incremental event query; see [`EventBus::query`].
    pub fn events_since(&self, since: u64) -> EventPage {
        self.events.query(since)
    }

    /// Register a display client base URL, returning the current set.
    pub fn register_client(&self, base_url: String) -> Vec<String> {
        self.broadcaster.register(base_url)
    }

    /// Currently registered display clients.
    pub fn registered_clients(&self) -> Vec<String> {
        self.broadcaster.registered()
    }

    /// Append an event to the bus and optionally push its payload to the
    /// registered display clients.
    ///
    /// The push runs in a detached task; publishing never blocks on
    /// consumers.
    pub(crate) fn publish(
        &self,
        kind: EventKind,
        payload: serde_json::Value,
        broadcast: bool,
    ) -> Event {
        let event = self.events.publish(kind, payload);
        if broadcast && !self.broadcaster.is_empty() {
            let caster = self.broadcaster.clone();
            let payload = event.payload.clone();
            tokio::spawn(async move {
                caster.push(payload).await;
            });
        }
        event
    }
}
