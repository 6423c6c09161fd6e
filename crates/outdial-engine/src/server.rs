//! # Campaign Server Manager
//!
//! Lifecycle wrapper around [`CampaignEngine`]: builds the engine, spawns
//! the background worker task, and tears it down again. The HTTP ingress
//! surface lives in the server binary; this type only manages the engine
//! and its worker.
//!
//! ## Examples
//!
//! ```rust
//! use std::sync::Arc;
//! use outdial_engine::prelude::*;
//!
//! # async fn example() -> Result<()> {
//! let provider = Arc::new(FakeTelephony::new());
//!
//! let mut server = CampaignServerBuilder::new()
//!     .with_config(CampaignConfig::default())
//!     .with_provider(provider)
//!     .build()?;
//!
//! server.start()?;
//!
//! // Submit datasets and control actions through server.engine() ...
//!
//! server.stop().await;
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::info;

use crate::config::CampaignConfig;
use crate::engine::CampaignEngine;
use crate::error::{CampaignError, Result};
use crate::telephony::TelephonyProvider;

/// A campaign server that manages the engine and its worker task.
pub struct CampaignServer {
    /// The core campaign engine
    engine: Arc<CampaignEngine>,

    /// Handle to the worker task while running
    worker_handle: Option<JoinHandle<()>>,
}

/// Builder for [`CampaignServer`].
pub struct CampaignServerBuilder {
    config: Option<CampaignConfig>,
    provider: Option<Arc<dyn TelephonyProvider>>,
}

impl CampaignServerBuilder {
    pub fn new() -> Self {
        Self {
            config: None,
            provider: None,
        }
    }

    /// Use this configuration instead of the defaults.
    pub fn with_config(mut self, config: CampaignConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Inject the telephony provider (required).
    pub fn with_provider(mut self, provider: Arc<dyn TelephonyProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Build the server. Fails without a provider — the engine has no
    /// function without one.
    pub fn build(self) -> Result<CampaignServer> {
        let provider = self.provider.ok_or_else(|| {
            CampaignError::configuration("a telephony provider must be injected")
        })?;
        let config = self.config.unwrap_or_default();
        let engine = CampaignEngine::new(config, provider)?;
        Ok(CampaignServer {
            engine,
            worker_handle: None,
        })
    }
}

impl Default for CampaignServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CampaignServer {
    /// The engine, for wiring ingress handlers.
    pub fn engine(&self) -> Arc<CampaignEngine> {
        self.engine.clone()
    }

    /// Spawn the worker task. Idempotent; a second call is a no-op.
    pub fn start(&mut self) -> Result<()> {
        if self.worker_handle.is_some() {
            return Ok(());
        }
        let engine = self.engine.clone();
        self.worker_handle = Some(tokio::spawn(engine.worker_loop()));
        info!("✅ campaign server started");
        Ok(())
    }

    /// Abort the worker task and wait for it to wind down.
    pub async fn stop(&mut self) {
        if let Some(handle) = self.worker_handle.take() {
            handle.abort();
            let _ = handle.await;
        }
        info!("🛑 campaign server stopped");
    }
}
