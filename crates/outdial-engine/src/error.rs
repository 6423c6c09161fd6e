use thiserror::Error;

/// Error types for campaign dialing operations
///
/// Covers everything from telephony failures through queue handling and
/// ingress validation.
///
/// # Examples
///
/// ```
/// use outdial_engine::{CampaignError, Result};
///
/// fn submit(items: &[&str]) -> Result<()> {
///     if items.is_empty() {
///         return Err(CampaignError::invalid_input("dataset contains no items"));
///     }
///     Ok(())
/// }
///
/// match submit(&[]) {
///     Ok(_) => println!("accepted"),
///     Err(CampaignError::InvalidInput(msg)) => println!("rejected: {}", msg),
///     Err(e) => println!("other error: {}", e),
/// }
/// ```
#[derive(Error, Debug)]
pub enum CampaignError {
    /// Telephony provider errors
    ///
    /// Raised by the injected provider for registration failures, dial
    /// setup problems, or hangup failures.
    ///
    /// # Examples
    /// - Identity registration refused
    /// - Provider backend unreachable
    #[error("Telephony error: {0}")]
    Telephony(String),

    /// Work queue errors
    #[error("Queue error: {0}")]
    Queue(String),

    /// Control state transition errors
    ///
    /// An operator action was structurally invalid (not merely
    /// not-applicable, which is reported without an error).
    #[error("Control error: {0}")]
    Control(String),

    /// Configuration validation errors
    ///
    /// # Examples
    /// - Zero event buffer capacity
    /// - Poll interval longer than the ring timeout
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Invalid ingress input
    ///
    /// A submission failed validation and was rejected synchronously,
    /// before anything was enqueued.
    ///
    /// # Examples
    /// - Empty item list
    /// - Missing dialing credential
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Requested resource could not be located
    #[error("Not found: {0}")]
    NotFound(String),

    /// Display-client broadcast errors
    ///
    /// Push failures to a registered display client. These are handled
    /// internally by pruning the client and never surface to operators.
    #[error("Broadcast error: {0}")]
    Broadcast(String),

    /// Unexpected internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<anyhow::Error> for CampaignError {
    fn from(err: anyhow::Error) -> Self {
        // Map anyhow errors to Internal by default, as they are usually
        // unexpected errors from lower-level components.
        Self::Internal(err.to_string())
    }
}

impl CampaignError {
    /// Create a new Telephony error with the provided message
    pub fn telephony<S: Into<String>>(msg: S) -> Self {
        Self::Telephony(msg.into())
    }

    /// Create a new Queue error with the provided message
    pub fn queue<S: Into<String>>(msg: S) -> Self {
        Self::Queue(msg.into())
    }

    /// Create a new Control error with the provided message
    pub fn control<S: Into<String>>(msg: S) -> Self {
        Self::Control(msg.into())
    }

    /// Create a new Configuration error with the provided message
    pub fn configuration<S: Into<String>>(msg: S) -> Self {
        Self::Configuration(msg.into())
    }

    /// Create a new InvalidInput error with the provided message
    pub fn invalid_input<S: Into<String>>(msg: S) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a new NotFound error with the provided message
    pub fn not_found<S: Into<String>>(msg: S) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create a new Broadcast error with the provided message
    pub fn broadcast<S: Into<String>>(msg: S) -> Self {
        Self::Broadcast(msg.into())
    }

    /// Create a new Internal error with the provided message
    pub fn internal<S: Into<String>>(msg: S) -> Self {
        Self::Internal(msg.into())
    }
}

/// Result type for campaign operations
///
/// Type alias for `std::result::Result<T, CampaignError>` used throughout
/// the engine.
pub type Result<T> = std::result::Result<T, CampaignError>;
