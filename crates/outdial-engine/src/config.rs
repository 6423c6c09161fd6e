use std::net::SocketAddr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{CampaignError, Result};

/// Campaign engine configuration
///
/// The main configuration structure covering every aspect of campaign
/// operation, from dial pacing through event retention and display-client
/// push behavior.
///
/// # Configuration Sections
///
/// - [`general`]: networking defaults for the ingress surface
/// - [`dialer`]: ring timeout, retry gap, and the worker poll interval
/// - [`events`]: event bus retention
/// - [`clients`]: display-client push behavior
///
/// # Examples
///
/// ## Default Configuration
///
/// ```
/// use outdial_engine::prelude::CampaignConfig;
///
/// let config = CampaignConfig::default();
/// assert_eq!(config.events.buffer_capacity, 2000);
/// assert_eq!(config.dialer.ring_timeout.as_secs(), 45);
/// ```
///
/// ## Custom Configuration
///
/// ```
/// use std::time::Duration;
/// use outdial_engine::prelude::CampaignConfig;
///
/// let mut config = CampaignConfig::default();
/// config.dialer.ring_timeout = Duration::from_secs(30);
/// config.dialer.retry_gap = Duration::from_secs(2);
///
/// config.validate().expect("configuration should be valid");
/// ```
///
/// [`general`]: GeneralConfig
/// [`dialer`]: DialerConfig
/// [`events`]: EventBusConfig
/// [`clients`]: ClientConfig
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CampaignConfig {
    /// Networking defaults for the ingress surface
    pub general: GeneralConfig,

    /// Dial pacing: ring timeout, retry gap, worker poll interval
    pub dialer: DialerConfig,

    /// Event bus retention settings
    pub events: EventBusConfig,

    /// Display-client push settings
    pub clients: ClientConfig,
}

/// General networking configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Address the ingress HTTP surface binds to
    pub bind_addr: SocketAddr,
}

/// Dial pacing configuration
///
/// These three durations bound every suspension point in the worker loop:
/// the queue wait, the pause gate, the dial wait, and the inter-attempt
/// gap. A stop request is observed within one `poll_interval`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DialerConfig {
    /// Maximum wait for a dialed leg to be answered before declaring timeout
    pub ring_timeout: Duration,

    /// Fixed delay between unsuccessful phases before the next number
    pub retry_gap: Duration,

    /// Poll interval for the worker's cooperative wait loops
    pub poll_interval: Duration,
}

/// Event bus retention configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventBusConfig {
    /// Ring buffer capacity; the oldest events are evicted past this point.
    /// Slow pollers that fall more than this many events behind lose the
    /// evicted window.
    pub buffer_capacity: usize,
}

/// Display-client push configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Path appended to each registered base URL when pushing events
    pub receive_path: String,

    /// Per-request timeout for pushes to display clients
    pub push_timeout: Duration,

    /// Port assumed for clients that register without one
    pub default_port: u16,
}

impl Default for CampaignConfig {
    fn default() -> Self {
        Self {
            general: GeneralConfig::default(),
            dialer: DialerConfig::default(),
            events: EventBusConfig::default(),
            clients: ClientConfig::default(),
        }
    }
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:7000".parse().expect("valid default bind address"),
        }
    }
}

impl Default for DialerConfig {
    fn default() -> Self {
        Self {
            ring_timeout: Duration::from_secs(45),
            retry_gap: Duration::from_secs(4),
            poll_interval: Duration::from_millis(200),
        }
    }
}

impl Default for EventBusConfig {
    fn default() -> Self {
        Self {
            buffer_capacity: 2000,
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            receive_path: "/receive-info".to_string(),
            push_timeout: Duration::from_millis(2500),
            default_port: 6000,
        }
    }
}

impl CampaignConfig {
    /// Validate the configuration
    ///
    /// Returns a [`CampaignError::Configuration`] describing the first
    /// problem found, or `Ok(())` when every section is usable.
    pub fn validate(&self) -> Result<()> {
        if self.dialer.ring_timeout.is_zero() {
            return Err(CampaignError::configuration("ring_timeout must be non-zero"));
        }
        if self.dialer.poll_interval.is_zero() {
            return Err(CampaignError::configuration("poll_interval must be non-zero"));
        }
        if self.dialer.poll_interval > self.dialer.ring_timeout {
            return Err(CampaignError::configuration(
                "poll_interval must not exceed ring_timeout",
            ));
        }
        if self.events.buffer_capacity == 0 {
            return Err(CampaignError::configuration(
                "event buffer_capacity must be non-zero",
            ));
        }
        if self.clients.receive_path.is_empty() || !self.clients.receive_path.starts_with('/') {
            return Err(CampaignError::configuration(
                "client receive_path must start with '/'",
            ));
        }
        if self.clients.push_timeout.is_zero() {
            return Err(CampaignError::configuration("push_timeout must be non-zero"));
        }
        Ok(())
    }
}
