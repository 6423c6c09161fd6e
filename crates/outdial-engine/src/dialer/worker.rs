//! The worker loop: the engine's single background execution context.

use std::sync::Arc;

use tokio::time::sleep;
use tracing::{debug, info};

use crate::contact::QueuedContact;
use crate::engine::CampaignEngine;

use super::{Gate, RegistrationCache};

impl CampaignEngine {
    /// Run the worker loop for the lifetime of the process.
    ///
    /// Consumes the queue one item at a time while the engine is running
    /// (or paused, in which case the held item waits at its first phase
    /// gate). The loop itself never exits; lifecycle management aborts the
    /// task (see [`CampaignServer`](crate::server::CampaignServer)).
    pub(crate) async fn worker_loop(self: Arc<Self>) {
        info!("📞 dial worker started");
        let poll = self.config.dialer.poll_interval;
        let mut registrations = RegistrationCache::new();

        loop {
            if !self.control.consuming_allowed() {
                sleep(poll).await;
                continue;
            }
            let Some(item) = self.queue.dequeue_timeout(poll).await else {
                continue;
            };
            self.process_item(item, &mut registrations).await;
        }
    }

    async fn process_item(&self, queued: QueuedContact, registrations: &mut RegistrationCache) {
        let QueuedContact { contact, identity } = queued;
        self.control.set_in_progress(&contact);

        // Gate before any phase starts. An item caught here by a stop is
        // skipped outright and does not count as processed.
        if self.wait_while_paused().await == Gate::Stopped {
            debug!("stop observed before dialing; skipping {}", contact.name);
            self.control.clear_in_progress();
            return;
        }

        self.run_sequence(&contact, &identity, registrations).await;

        self.control.mark_processed();
        self.control.clear_in_progress();
    }

    /// Hold while paused, polling at the configured interval.
    ///
    /// Pause only gates the start of phases; it never tears down an
    /// in-flight call. Stop wins over pause.
    pub(crate) async fn wait_while_paused(&self) -> Gate {
        let poll = self.config.dialer.poll_interval;
        loop {
            if self.control.stop_requested() {
                return Gate::Stopped;
            }
            if !self.control.is_paused() {
                return Gate::Proceed;
            }
            sleep(poll).await;
        }
    }

    /// Sleep for `wait` unless a stop arrives first.
    pub(crate) async fn sleep_with_stop(&self, wait: std::time::Duration) -> Gate {
        tokio::select! {
            _ = sleep(wait) => Gate::Proceed,
            _ = self.control.stopped() => Gate::Stopped,
        }
    }
}
