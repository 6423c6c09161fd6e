//! # OUTDIAL Engine
//!
//! A sequential outbound-calling campaign orchestrator. Given a batch of
//! contact records — a primary party plus two emergency contacts — the
//! engine dials each number in priority order, tracks progress, lets an
//! operator pause/resume/stop mid-batch, and exposes a near-real-time
//! progress feed to remote display clients.
//!
//! ## Overview
//!
//! - **Call Orchestration**: a single worker drives one contact at a time
//!   through a three-party bridge attempt and emergency-contact fallbacks
//! - **Operator Control**: `call`/`pause`/`start`/`stop` with validated,
//!   idempotent-safe transitions and a bounded stop latency
//! - **Event Bus**: a bounded, monotonically-sequenced log queryable by
//!   sequence bookmark, so pollers reconstruct progress without gaps
//! - **Display-Client Push**: best-effort fan-out of every event payload
//!   to registered dashboards, with lazy pruning on delivery failure
//! - **Injected Telephony**: all SIP signaling sits behind the
//!   [`TelephonyProvider`](crate::telephony::TelephonyProvider) trait; a
//!   deterministic fake makes the whole dial sequence unit-testable
//!   without a SIP stack
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────┐  ┌───────────────┐  ┌──────────────────┐
//! │ submit-dataset │  │ control/status │  │ events / clients │
//! └───────┬───────┘  └───────┬───────┘  └────────┬─────────┘
//!         └───────────────────┼───────────────────┘
//!                             │
//!                    ┌────────────────┐
//!                    │ CampaignEngine │
//!                    └────────────────┘
//!                             │
//!        ┌────────────┬───────┴──────┬──────────────┐
//!        │            │              │              │
//!  ┌───────────┐ ┌──────────┐ ┌───────────┐ ┌─────────────┐
//!  │ DialQueue │ │ Control  │ │ EventBus  │ │ Broadcaster │
//!  └───────────┘ └──────────┘ └───────────┘ └─────────────┘
//!                             │
//!                    ┌────────────────────┐
//!                    │ TelephonyProvider  │ (injected)
//!                    └────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```
//! use std::sync::Arc;
//! use outdial_engine::prelude::*;
//!
//! # async fn example() -> Result<()> {
//! // A deterministic provider; production injects a real SIP-backed one.
//! let provider = Arc::new(FakeTelephony::new());
//! provider.answer("0811");
//!
//! let mut server = CampaignServerBuilder::new()
//!     .with_config(CampaignConfig::default())
//!     .with_provider(provider)
//!     .build()?;
//! server.start()?;
//!
//! let engine = server.engine();
//! let receipt = engine.submit_dataset(DatasetSubmission {
//!     credential: DialIdentity {
//!         username: "7001".to_string(),
//!         password: "secret".to_string(),
//!     },
//!     items: vec![ContactItem {
//!         name: "A. Customer".to_string(),
//!         primary_phone: "0811".to_string(),
//!         ec1_name: String::new(),
//!         ec1_phone: String::new(),
//!         ec2_name: String::new(),
//!         ec2_phone: String::new(),
//!         amount_due: "1200".to_string(),
//!     }],
//! })?;
//! assert_eq!(receipt.enqueued, 1);
//!
//! // Nothing dials until the operator says so.
//! engine.apply_control(ControlAction::Call).await;
//!
//! // Poll progress incrementally.
//! let page = engine.events_since(0);
//! println!("{} events so far", page.events.len());
//! # Ok(())
//! # }
//! ```

pub mod clients;
pub mod config;
pub mod contact;
pub mod control;
pub mod dialer;
pub mod engine;
pub mod error;
pub mod events;
pub mod queue;
pub mod server;
pub mod telephony;

pub use config::CampaignConfig;
pub use engine::CampaignEngine;
pub use error::{CampaignError, Result};
pub use server::{CampaignServer, CampaignServerBuilder};

/// Common imports for engine consumers.
pub mod prelude {
    pub use crate::config::{
        CampaignConfig, ClientConfig, DialerConfig, EventBusConfig, GeneralConfig,
    };
    pub use crate::contact::{
        ContactItem, DatasetSubmission, DialIdentity, EnqueueReceipt, QueuedContact,
    };
    pub use crate::control::{
        ActionReport, ControlAction, ControlState, EnginePhase, StatusSnapshot,
    };
    pub use crate::engine::CampaignEngine;
    pub use crate::error::{CampaignError, Result};
    pub use crate::events::{Event, EventBus, EventKind, EventPage};
    pub use crate::queue::DialQueue;
    pub use crate::server::{CampaignServer, CampaignServerBuilder};
    pub use crate::telephony::{
        DialDetail, DialOutcome, FakeTelephony, SimulatedTelephony, TelephonyProvider,
    };
}
