//! Simulated telephony provider for running the server without a SIP stack.
//!
//! Rings for a short fixed time and answers probabilistically. Useful for
//! demos and for exercising the full ingress-to-event pipeline end to end.
//!
//! TODO: add a provider backed by a real SIP stack (Asterisk ARI or
//! FreeSWITCH ESL) behind the same trait.

use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use crate::error::Result;

use super::{DialDetail, DialOutcome, TelephonyProvider};

/// Probabilistic demo provider.
pub struct SimulatedTelephony {
    answer_probability: f64,
    ring_delay: Duration,
    rng: Mutex<SmallRng>,
}

impl SimulatedTelephony {
    /// Create a provider that rings ~3s and answers ~30% of attempts.
    pub fn new() -> Self {
        Self::with_behavior(0.30, Duration::from_secs(3))
    }

    /// Create a provider with explicit answer odds and ring time.
    pub fn with_behavior(answer_probability: f64, ring_delay: Duration) -> Self {
        Self {
            answer_probability: answer_probability.clamp(0.0, 1.0),
            ring_delay,
            rng: Mutex::new(SmallRng::from_entropy()),
        }
    }

    fn roll(&self) -> bool {
        self.rng.lock().gen_bool(self.answer_probability)
    }

    async fn ring(&self, ring_timeout: Duration) {
        tokio::time::sleep(self.ring_delay.min(ring_timeout)).await;
    }
}

impl Default for SimulatedTelephony {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TelephonyProvider for SimulatedTelephony {
    async fn register_identity(&self, username: &str, _password: &str) -> Result<()> {
        info!("📡 simulated registration as {}", username);
        Ok(())
    }

    async fn dial_single_leg(&self, number: &str, ring_timeout: Duration) -> Result<DialOutcome> {
        self.ring(ring_timeout).await;
        let outcome = if self.roll() {
            DialOutcome::success(DialDetail::Answered)
        } else {
            DialOutcome::failure(DialDetail::Timeout)
        };
        debug!("simulated dial {} -> {}", number, outcome.detail);
        Ok(outcome)
    }

    async fn dial_and_bridge(
        &self,
        agent_identity: &str,
        peer_number: &str,
        ring_timeout: Duration,
    ) -> Result<DialOutcome> {
        self.ring(ring_timeout).await;
        let outcome = if self.roll() {
            DialOutcome::success(DialDetail::Bridged)
        } else {
            DialOutcome::failure(DialDetail::PeerNoAnswer)
        };
        debug!(
            "simulated bridge {} <-> {} -> {}",
            agent_identity, peer_number, outcome.detail
        );
        Ok(outcome)
    }

    async fn hangup_all(&self) -> Result<()> {
        debug!("simulated hangup of all legs");
        Ok(())
    }
}
