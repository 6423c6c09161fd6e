//! # Dial Worker & Sequencer
//!
//! The single background execution context of the engine. The worker loop
//! ([`worker`]) pulls one contact at a time from the queue and drives it
//! through the per-item dial sequence ([`sequencer`]): register the
//! calling identity, attempt the three-party bridge to the primary number,
//! then fall through the emergency-contact numbers in priority order.
//!
//! One item is in flight at a time by design: a single calling identity
//! cannot sustain concurrent legs. Every suspension point (queue wait,
//! pause gate, dial wait, retry gap) is bounded by the configured poll
//! interval or ring timeout and observes the global stop signal within
//! that bound.

pub mod registration;
pub mod sequencer;
pub mod worker;

pub use registration::RegistrationCache;

/// The dialing phases of one contact item, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DialPhase {
    /// Three-party bridge attempt to the primary number
    Primary,
    /// Single-leg dial to the first emergency contact
    Ec1,
    /// Single-leg dial to the second emergency contact
    Ec2,
}

impl DialPhase {
    /// Label used in result progress events
    pub(crate) fn label(&self) -> &'static str {
        match self {
            Self::Primary => "PRIMARY",
            Self::Ec1 => "EC1",
            Self::Ec2 => "EC2",
        }
    }

    /// Label used in pre-call progress events
    pub(crate) fn calling_label(&self) -> &'static str {
        match self {
            Self::Primary => "CALLING_PRIMARY",
            Self::Ec1 => "CALLING_EC1",
            Self::Ec2 => "CALLING_EC2",
        }
    }
}

/// Result of a cooperative wait: either the gate opened or stop arrived.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Gate {
    Proceed,
    Stopped,
}
