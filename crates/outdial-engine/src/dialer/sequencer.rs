//! Per-item dial sequence.
//!
//! Walks one contact through `LOGIN -> PRIMARY (bridge) -> EC1 -> EC2`,
//! publishing a pre-call and a result progress event for every phase
//! attempted. A bridged primary ends the item immediately; an answered
//! emergency contact ends it as handled; a stop observed during any wait
//! aborts the item without advancing further.

use serde_json::json;
use tracing::{info, warn};

use crate::contact::{ContactItem, DialIdentity};
use crate::engine::CampaignEngine;
use crate::events::EventKind;
use crate::telephony::{DialDetail, DialOutcome};

use super::{DialPhase, Gate, RegistrationCache};

fn progress_payload(
    contact: &ContactItem,
    phase: &str,
    number: &str,
    answered: Option<bool>,
    detail: &str,
) -> serde_json::Value {
    json!({
        "contact": contact,
        "progress": {
            "phase": phase,
            "number": number,
            "answered": answered,
            "detail": detail,
        },
    })
}

impl CampaignEngine {
    /// Run the full dial sequence for one dequeued contact.
    ///
    /// Returns when the item is finished, for any reason; the caller
    /// counts it processed either way.
    pub(crate) async fn run_sequence(
        &self,
        contact: &ContactItem,
        identity: &DialIdentity,
        registrations: &mut RegistrationCache,
    ) {
        // LOGIN: make sure the provider is registered as this item's
        // credential. Failure terminates the item, not the worker.
        match registrations.ensure(self.provider.as_ref(), identity).await {
            Ok(fresh) => {
                if fresh {
                    info!("🔑 registered calling identity {}", identity.username);
                }
                self.control.set_active_identity(&identity.username);
            }
            Err(e) => {
                warn!("🔑 registration failed for {}: {}", identity.username, e);
                self.control.clear_active_identity();
                let payload = progress_payload(
                    contact,
                    "LOGIN",
                    "-",
                    Some(false),
                    &format!("login_failed:{e}"),
                );
                self.publish(EventKind::Progress, payload, true);
                return;
            }
        }

        let phases = [
            (DialPhase::Primary, contact.primary_phone.as_str()),
            (DialPhase::Ec1, contact.ec1_phone.as_str()),
            (DialPhase::Ec2, contact.ec2_phone.as_str()),
        ];

        for (phase, number) in phases {
            if number.is_empty() {
                // Missing secondary numbers skip their phase without delay.
                continue;
            }
            if self.control.stop_requested() {
                return;
            }
            if self.wait_while_paused().await == Gate::Stopped {
                return;
            }

            let pre = progress_payload(
                contact,
                phase.calling_label(),
                number,
                None,
                &DialDetail::Ringing.to_string(),
            );
            self.publish(EventKind::Progress, pre, true);

            let outcome = self.dial_phase(phase, number, &identity.username).await;
            info!(
                "[DIAL] {} {} -> answered={} ({})",
                phase.label(),
                number,
                outcome.answered,
                outcome.detail
            );

            let result = progress_payload(
                contact,
                phase.label(),
                number,
                Some(outcome.answered),
                &outcome.detail.to_string(),
            );
            self.publish(EventKind::Progress, result, true);

            if outcome.detail == DialDetail::Aborted {
                return;
            }
            if outcome.answered {
                // Bridged primary: the conversation is live and no longer
                // tracked here. Answered EC: treated as handled.
                return;
            }

            if self.sleep_with_stop(self.config.dialer.retry_gap).await == Gate::Stopped {
                return;
            }
        }
    }

    /// One bounded dial attempt, cancellable by the global stop signal.
    ///
    /// On stop the in-flight legs are hung up and the outcome is
    /// `aborted`; a provider error becomes an `error:` outcome rather
    /// than failing the worker.
    async fn dial_phase(&self, phase: DialPhase, number: &str, agent: &str) -> DialOutcome {
        let ring_timeout = self.config.dialer.ring_timeout;
        let dial = async {
            match phase {
                DialPhase::Primary => {
                    self.provider
                        .dial_and_bridge(agent, number, ring_timeout)
                        .await
                }
                DialPhase::Ec1 | DialPhase::Ec2 => {
                    self.provider.dial_single_leg(number, ring_timeout).await
                }
            }
        };

        tokio::select! {
            result = dial => match result {
                Ok(outcome) => outcome,
                Err(e) => DialOutcome::failure(DialDetail::Error(e.to_string())),
            },
            _ = self.control.stopped() => {
                if let Err(e) = self.provider.hangup_all().await {
                    warn!("hangup after stop failed: {}", e);
                }
                DialOutcome::aborted()
            }
        }
    }
}
