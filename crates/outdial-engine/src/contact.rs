//! Contact records and dataset submissions.
//!
//! A [`ContactItem`] is one row of a submitted dataset: the primary party's
//! number plus up to two emergency-contact numbers and free-form display
//! fields. Items are immutable once enqueued; the worker takes ownership on
//! dequeue and discards the item after processing.

use serde::{Deserialize, Serialize};

/// One unit of dialing work: a primary party plus two emergency contacts.
///
/// Secondary names and numbers may be empty; an empty number skips its
/// dial phase without delay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactItem {
    /// Primary party display name
    pub name: String,
    /// Primary phone number, first dial priority
    pub primary_phone: String,
    /// First emergency contact display name
    #[serde(default)]
    pub ec1_name: String,
    /// First emergency contact number, dialed if the primary does not bridge
    #[serde(default)]
    pub ec1_phone: String,
    /// Second emergency contact display name
    #[serde(default)]
    pub ec2_name: String,
    /// Second emergency contact number, dialed last
    #[serde(default)]
    pub ec2_phone: String,
    /// Free-form display amount shown on dashboards
    #[serde(default)]
    pub amount_due: String,
}

/// Calling credential attached to every item of a dataset at enqueue time.
///
/// The registered telephony identity is a shared session reused across
/// items; re-registration only happens when this credential changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialIdentity {
    /// Account username for the telephony provider
    pub username: String,
    /// Account password for the telephony provider
    pub password: String,
}

/// A contact item paired with the credential it was submitted under.
///
/// This is the unit that travels through the work queue. Ownership
/// transfers to the worker loop on dequeue.
#[derive(Debug, Clone)]
pub struct QueuedContact {
    /// The contact record to dial
    pub contact: ContactItem,
    /// The credential to dial it under
    pub identity: DialIdentity,
}

/// An operator-submitted dataset: one credential plus the items to dial.
#[derive(Debug, Clone, Deserialize)]
pub struct DatasetSubmission {
    /// Credential every item of this dataset dials under
    pub credential: DialIdentity,
    /// Contact records, processed in submission order
    pub items: Vec<ContactItem>,
}

/// Receipt returned by a successful dataset submission.
#[derive(Debug, Clone, Serialize)]
pub struct EnqueueReceipt {
    /// Number of items accepted into the queue
    pub enqueued: usize,
    /// Queue depth immediately after the submission
    pub queue_depth: usize,
}
