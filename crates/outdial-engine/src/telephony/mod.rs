//! # Telephony Provider
//!
//! The engine never speaks SIP itself; all signaling is behind the
//! [`TelephonyProvider`] trait, injected at engine construction. The
//! engine treats every operation as fallible and time-bounded and reacts
//! only to the outcomes in [`DialDetail`].
//!
//! Leg tie-break contract for implementors: when both an answer and a
//! disconnect are observed for the same leg, answered takes precedence
//! only if it was observed first. A disconnect seen before any answer is
//! a definitive failure for that leg and is never retried within the
//! same phase.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::Result;

pub mod fake;
pub mod sim;

pub use fake::FakeTelephony;
pub use sim::SimulatedTelephony;

/// Fine-grained outcome of one dial attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialDetail {
    /// Leg is being rung (pre-result only)
    Ringing,
    /// Single leg answered
    Answered,
    /// Ring timeout elapsed without an answer
    Timeout,
    /// Leg disconnected before answering
    Disconnected,
    /// Both legs answered and were connected bidirectionally
    Bridged,
    /// The agent leg of a bridge attempt was not answered
    AgentNoAnswer,
    /// The peer leg of a bridge attempt was not answered
    PeerNoAnswer,
    /// Attempt interrupted by a global stop
    Aborted,
    /// Provider-reported error
    Error(String),
}

impl std::fmt::Display for DialDetail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ringing => f.write_str("ringing"),
            Self::Answered => f.write_str("answered"),
            Self::Timeout => f.write_str("timeout"),
            Self::Disconnected => f.write_str("disconnected"),
            Self::Bridged => f.write_str("bridged"),
            Self::AgentNoAnswer => f.write_str("agent_no_answer"),
            Self::PeerNoAnswer => f.write_str("peer_no_answer"),
            Self::Aborted => f.write_str("aborted"),
            Self::Error(reason) => write!(f, "error:{reason}"),
        }
    }
}

/// Result of one call attempt through the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialOutcome {
    /// Whether the attempt reached an answered (or bridged) state
    pub answered: bool,
    /// What specifically happened
    pub detail: DialDetail,
}

impl DialOutcome {
    /// An answered/bridged outcome
    pub fn success(detail: DialDetail) -> Self {
        Self {
            answered: true,
            detail,
        }
    }

    /// A not-answered outcome with a specific detail
    pub fn failure(detail: DialDetail) -> Self {
        Self {
            answered: false,
            detail,
        }
    }

    /// Outcome for an attempt interrupted by a global stop
    pub fn aborted() -> Self {
        Self::failure(DialDetail::Aborted)
    }
}

/// Injected telephony capability.
///
/// Implementations register a calling identity, place one-leg calls, place
/// and bridge two-leg calls, and hang up everything on demand. All
/// operations are fallible and bounded by the caller-supplied timeout; the
/// engine never assumes success.
#[async_trait]
pub trait TelephonyProvider: Send + Sync {
    /// Register `username` as the active calling identity.
    ///
    /// Replaces any previously registered identity. The engine caches the
    /// active credential and only calls this when it changes.
    async fn register_identity(&self, username: &str, password: &str) -> Result<()>;

    /// Dial a single leg and wait up to `ring_timeout` for an answer.
    async fn dial_single_leg(&self, number: &str, ring_timeout: Duration) -> Result<DialOutcome>;

    /// Three-party bridge attempt: dial the identity's own agent leg, wait
    /// up to `ring_timeout`; on answer dial `peer_number` and wait again;
    /// on answer connect both legs bidirectionally.
    ///
    /// A [`DialDetail::Bridged`] outcome means the conversation is live;
    /// the engine considers the item complete and does not track the call
    /// further.
    async fn dial_and_bridge(
        &self,
        agent_identity: &str,
        peer_number: &str,
        ring_timeout: Duration,
    ) -> Result<DialOutcome>;

    /// Hang up every active leg immediately. Used by the stop path.
    async fn hangup_all(&self) -> Result<()>;
}
