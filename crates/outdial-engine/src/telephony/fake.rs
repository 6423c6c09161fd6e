//! Deterministic in-memory telephony provider for tests.
//!
//! Behavior is configured per number (answer after a delay, never answer,
//! disconnect mid-ring) and per identity (registration refusal, agent leg
//! unreachable), which makes the dial sequencer fully testable without a
//! SIP stack. Registrations and hangups are counted so tests can assert
//! on the credential-cache and stop paths.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use dashmap::{DashMap, DashSet};
use parking_lot::Mutex;

use crate::error::{CampaignError, Result};

use super::{DialDetail, DialOutcome, TelephonyProvider};

/// Configured behavior for one dialed number.
#[derive(Debug, Clone)]
pub enum NumberBehavior {
    /// Answer after the given ring time (fails with timeout if it exceeds
    /// the attempt's ring timeout)
    AnswerAfter(Duration),
    /// Ring for the full timeout, never answer
    NeverAnswer,
    /// Disconnect after the given ring time without answering
    DisconnectAfter(Duration),
}

/// Deterministic fake provider.
pub struct FakeTelephony {
    behaviors: DashMap<String, NumberBehavior>,
    rejected_identities: DashSet<String>,
    unreachable_agents: DashSet<String>,
    registrations: Mutex<Vec<String>>,
    hangups: AtomicUsize,
    answer_delay: Duration,
}

impl FakeTelephony {
    pub fn new() -> Self {
        Self {
            behaviors: DashMap::new(),
            rejected_identities: DashSet::new(),
            unreachable_agents: DashSet::new(),
            registrations: Mutex::new(Vec::new()),
            hangups: AtomicUsize::new(0),
            answer_delay: Duration::from_millis(10),
        }
    }

    /// Configure `number` to answer after the default short ring.
    pub fn answer(&self, number: &str) {
        self.behaviors.insert(
            number.to_string(),
            NumberBehavior::AnswerAfter(self.answer_delay),
        );
    }

    /// Configure `number` to answer after `ring_for`.
    pub fn answer_after(&self, number: &str, ring_for: Duration) {
        self.behaviors
            .insert(number.to_string(), NumberBehavior::AnswerAfter(ring_for));
    }

    /// Configure `number` to ring out without answering.
    pub fn never_answer(&self, number: &str) {
        self.behaviors
            .insert(number.to_string(), NumberBehavior::NeverAnswer);
    }

    /// Configure `number` to disconnect shortly after ringing starts.
    pub fn disconnect(&self, number: &str) {
        self.behaviors.insert(
            number.to_string(),
            NumberBehavior::DisconnectAfter(self.answer_delay),
        );
    }

    /// Refuse registration attempts for `username`.
    pub fn reject_identity(&self, username: &str) {
        self.rejected_identities.insert(username.to_string());
    }

    /// Make bridge attempts under `username` fail on the agent leg.
    pub fn agent_unreachable(&self, username: &str) {
        self.unreachable_agents.insert(username.to_string());
    }

    /// Usernames registered so far, in order.
    pub fn registrations(&self) -> Vec<String> {
        self.registrations.lock().clone()
    }

    /// Number of successful registrations.
    pub fn registration_count(&self) -> usize {
        self.registrations.lock().len()
    }

    /// Number of `hangup_all` calls observed.
    pub fn hangup_count(&self) -> usize {
        self.hangups.load(Ordering::SeqCst)
    }

    /// Ring the configured behavior for `number` to its conclusion.
    ///
    /// An unconfigured number rings out for the full timeout. A disconnect
    /// observed before the answer point is definitive for the leg.
    async fn resolve(&self, number: &str, ring_timeout: Duration) -> DialOutcome {
        let behavior = self.behaviors.get(number).map(|b| b.value().clone());
        match behavior {
            Some(NumberBehavior::AnswerAfter(after)) if after <= ring_timeout => {
                tokio::time::sleep(after).await;
                DialOutcome::success(DialDetail::Answered)
            }
            Some(NumberBehavior::DisconnectAfter(after)) if after <= ring_timeout => {
                tokio::time::sleep(after).await;
                DialOutcome::failure(DialDetail::Disconnected)
            }
            _ => {
                tokio::time::sleep(ring_timeout).await;
                DialOutcome::failure(DialDetail::Timeout)
            }
        }
    }
}

impl Default for FakeTelephony {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TelephonyProvider for FakeTelephony {
    async fn register_identity(&self, username: &str, _password: &str) -> Result<()> {
        if self.rejected_identities.contains(username) {
            return Err(CampaignError::telephony(format!(
                "registration refused for {username}"
            )));
        }
        self.registrations.lock().push(username.to_string());
        Ok(())
    }

    async fn dial_single_leg(&self, number: &str, ring_timeout: Duration) -> Result<DialOutcome> {
        Ok(self.resolve(number, ring_timeout).await)
    }

    async fn dial_and_bridge(
        &self,
        agent_identity: &str,
        peer_number: &str,
        ring_timeout: Duration,
    ) -> Result<DialOutcome> {
        if self.unreachable_agents.contains(agent_identity) {
            tokio::time::sleep(ring_timeout).await;
            return Ok(DialOutcome::failure(DialDetail::AgentNoAnswer));
        }
        // Agent leg answers promptly; the peer leg decides the outcome.
        let peer = self.resolve(peer_number, ring_timeout).await;
        let outcome = match peer.detail {
            DialDetail::Answered => DialOutcome::success(DialDetail::Bridged),
            DialDetail::Timeout => DialOutcome::failure(DialDetail::PeerNoAnswer),
            other => DialOutcome::failure(other),
        };
        Ok(outcome)
    }

    async fn hangup_all(&self) -> Result<()> {
        self.hangups.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
