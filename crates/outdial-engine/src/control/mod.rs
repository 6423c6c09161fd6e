//! # Control State & Gating
//!
//! Process-wide run/pause/stop state for the campaign, guarded by a single
//! mutex. The run state is a tagged [`EnginePhase`] with validated
//! transitions rather than independent booleans, so the invalid
//! combinations a boolean cross-product would allow are unrepresentable.
//! Stop is additionally signalled through a watch channel so every wait
//! loop in the worker observes it within one poll interval.
//!
//! All four operator actions are idempotent-safe: an action whose
//! precondition does not hold reports not-applicable instead of corrupting
//! state.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use crate::contact::ContactItem;

/// Tagged campaign run state.
///
/// `Idle` is the boot state before the first `call` action; `Stopped` is
/// the terminal snapshot after a stop until the next `call`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EnginePhase {
    /// No `call` action issued yet; worker does not consume
    Idle,
    /// Worker consumes the queue and dials
    Running,
    /// Worker holds at phase boundaries; in-flight bridges are untouched
    Paused,
    /// Stop issued; queue drained, worker skips any held item
    Stopped,
}

/// The four operator actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ControlAction {
    /// Begin (or restart) consuming the queue
    Call,
    /// Gate the worker before the next phase boundary
    Pause,
    /// Resume from pause
    Start,
    /// Stop everything: drain the queue, hang up all legs
    Stop,
}

impl std::str::FromStr for ControlAction {
    type Err = crate::error::CampaignError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "call" => Ok(Self::Call),
            "pause" => Ok(Self::Pause),
            "start" => Ok(Self::Start),
            "stop" => Ok(Self::Stop),
            other => Err(crate::error::CampaignError::invalid_input(format!(
                "unknown control action: {other}"
            ))),
        }
    }
}

impl std::fmt::Display for ControlAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Call => "call",
            Self::Pause => "pause",
            Self::Start => "start",
            Self::Stop => "stop",
        };
        f.write_str(s)
    }
}

/// Outcome of applying a control action.
///
/// `applied == false` means the action's precondition did not hold; state
/// is unchanged.
#[derive(Debug, Clone, Serialize)]
pub struct ActionReport {
    /// The action that was requested
    pub action: ControlAction,
    /// Whether the transition actually happened
    pub applied: bool,
    /// Operator-facing description of what happened
    pub message: String,
}

impl ActionReport {
    pub(crate) fn applied(action: ControlAction, message: impl Into<String>) -> Self {
        Self {
            action,
            applied: true,
            message: message.into(),
        }
    }

    pub(crate) fn not_applicable(action: ControlAction, message: impl Into<String>) -> Self {
        Self {
            action,
            applied: false,
            message: message.into(),
        }
    }
}

/// Point-in-time view of the control state plus live queue depth.
///
/// The boolean trio mirrors what dashboards historically consumed; it is
/// derived from the tagged phase (`running` stays true while paused).
#[derive(Debug, Clone, Serialize)]
pub struct StatusSnapshot {
    /// True while the engine is Running or Paused
    pub running: bool,
    /// True only in the Paused phase
    pub paused: bool,
    /// True only in the Stopped phase
    pub stopped: bool,
    /// The item currently held by the worker, if any
    pub in_progress: Option<ContactItem>,
    /// Items fully processed (completed or aborted mid-phase)
    pub processed: u64,
    /// Cumulative count of items ever enqueued
    pub queued: u64,
    /// Username of the currently registered calling identity
    pub active_identity: Option<String>,
    /// Items currently waiting in the queue
    pub queue_depth: usize,
}

struct ControlInner {
    phase: EnginePhase,
    in_progress: Option<ContactItem>,
    processed: u64,
    queued: u64,
    active_identity: Option<String>,
}

/// Process-wide control state, one instance per engine.
///
/// All transitions happen under one mutex; the stop flag is mirrored into
/// a watch channel for `select!`-based cancellation in the dial waits.
pub struct ControlState {
    inner: Mutex<ControlInner>,
    stop_tx: watch::Sender<bool>,
}

impl ControlState {
    pub fn new() -> Self {
        let (stop_tx, _) = watch::channel(false);
        Self {
            inner: Mutex::new(ControlInner {
                phase: EnginePhase::Idle,
                in_progress: None,
                processed: 0,
                queued: 0,
                active_identity: None,
            }),
            stop_tx,
        }
    }

    /// `call`: enter Running from any phase and clear the stop signal.
    pub fn begin_dialing(&self) {
        let mut inner = self.inner.lock();
        inner.phase = EnginePhase::Running;
        self.stop_tx.send_replace(false);
    }

    /// `pause`: Running -> Paused. Returns false when not Running.
    pub fn pause(&self) -> bool {
        let mut inner = self.inner.lock();
        if inner.phase == EnginePhase::Running {
            inner.phase = EnginePhase::Paused;
            true
        } else {
            false
        }
    }

    /// `start`: Paused -> Running. Returns false when not Paused.
    pub fn resume(&self) -> bool {
        let mut inner = self.inner.lock();
        if inner.phase == EnginePhase::Paused {
            inner.phase = EnginePhase::Running;
            true
        } else {
            false
        }
    }

    /// `stop`: enter Stopped from any phase and raise the stop signal.
    pub fn stop(&self) {
        let mut inner = self.inner.lock();
        inner.phase = EnginePhase::Stopped;
        self.stop_tx.send_replace(true);
    }

    /// Current phase
    pub fn phase(&self) -> EnginePhase {
        self.inner.lock().phase
    }

    /// Whether the worker may pull the next item (Running or Paused; a
    /// paused worker dequeues and then holds at the first phase gate).
    pub fn consuming_allowed(&self) -> bool {
        matches!(
            self.inner.lock().phase,
            EnginePhase::Running | EnginePhase::Paused
        )
    }

    pub fn is_paused(&self) -> bool {
        self.inner.lock().phase == EnginePhase::Paused
    }

    /// Non-blocking stop check for poll loops
    pub fn stop_requested(&self) -> bool {
        *self.stop_tx.borrow()
    }

    /// Resolve when a stop is requested.
    ///
    /// Completes immediately when stop is already raised; otherwise waits
    /// on the watch channel. Intended for `tokio::select!` against a dial
    /// or sleep future.
    pub async fn stopped(&self) {
        let mut rx = self.stop_tx.subscribe();
        if *rx.borrow() {
            return;
        }
        while rx.changed().await.is_ok() {
            if *rx.borrow() {
                return;
            }
        }
        // Sender lives as long as this state; unreachable in practice.
        std::future::pending::<()>().await
    }

    pub(crate) fn set_in_progress(&self, contact: &ContactItem) {
        self.inner.lock().in_progress = Some(contact.clone());
    }

    pub(crate) fn clear_in_progress(&self) {
        self.inner.lock().in_progress = None;
    }

    pub(crate) fn set_active_identity(&self, username: &str) {
        self.inner.lock().active_identity = Some(username.to_string());
    }

    pub(crate) fn clear_active_identity(&self) {
        self.inner.lock().active_identity = None;
    }

    pub(crate) fn mark_processed(&self) {
        self.inner.lock().processed += 1;
    }

    pub(crate) fn add_queued(&self, count: u64) {
        self.inner.lock().queued += count;
    }

    /// Snapshot the control state together with the live queue depth.
    pub fn snapshot(&self, queue_depth: usize) -> StatusSnapshot {
        let inner = self.inner.lock();
        StatusSnapshot {
            running: matches!(inner.phase, EnginePhase::Running | EnginePhase::Paused),
            paused: inner.phase == EnginePhase::Paused,
            stopped: inner.phase == EnginePhase::Stopped,
            in_progress: inner.in_progress.clone(),
            processed: inner.processed,
            queued: inner.queued,
            active_identity: inner.active_identity.clone(),
            queue_depth,
        }
    }
}

impl Default for ControlState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boots_idle() {
        let control = ControlState::new();
        assert_eq!(control.phase(), EnginePhase::Idle);
        assert!(!control.consuming_allowed());
        assert!(!control.stop_requested());
    }

    #[test]
    fn pause_requires_running() {
        let control = ControlState::new();
        assert!(!control.pause());
        control.begin_dialing();
        assert!(control.pause());
        assert_eq!(control.phase(), EnginePhase::Paused);
        // Pausing twice is not applicable the second time.
        assert!(!control.pause());
    }

    #[test]
    fn resume_requires_paused() {
        let control = ControlState::new();
        control.begin_dialing();
        assert!(!control.resume());
        control.pause();
        assert!(control.resume());
        assert_eq!(control.phase(), EnginePhase::Running);
    }

    #[test]
    fn stop_from_any_phase_raises_signal() {
        let control = ControlState::new();
        control.stop();
        assert_eq!(control.phase(), EnginePhase::Stopped);
        assert!(control.stop_requested());

        // A fresh call clears the signal and re-enters Running.
        control.begin_dialing();
        assert_eq!(control.phase(), EnginePhase::Running);
        assert!(!control.stop_requested());
    }

    #[test]
    fn snapshot_booleans_follow_phase() {
        let control = ControlState::new();
        let s = control.snapshot(0);
        assert!(!s.running && !s.paused && !s.stopped);

        control.begin_dialing();
        control.pause();
        let s = control.snapshot(3);
        assert!(s.running && s.paused && !s.stopped);
        assert_eq!(s.queue_depth, 3);

        control.stop();
        let s = control.snapshot(0);
        assert!(!s.running && !s.paused && s.stopped);
    }

    #[tokio::test]
    async fn stopped_future_resolves_on_stop() {
        let control = std::sync::Arc::new(ControlState::new());
        control.begin_dialing();

        let waiter = control.clone();
        let handle = tokio::spawn(async move { waiter.stopped().await });
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        control.stop();
        tokio::time::timeout(std::time::Duration::from_secs(1), handle)
            .await
            .expect("stop should resolve the waiter")
            .unwrap();
    }
}
