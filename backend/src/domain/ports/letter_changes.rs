//! Port for table-level change notifications.
//!
//! Notifications carry only the kind of write. Subscribers are expected to
//! re-fetch the table rather than patch their copy.

use serde::Serialize;
use tokio::sync::broadcast;

/// Kind of confirmed write on the letters table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LetterChange {
    Insert,
    Update,
    Delete,
}

/// What a subscriber observed on its next receive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeNotice {
    /// A write happened.
    Changed(LetterChange),
    /// The subscriber fell behind and dropped this many notifications.
    Missed(u64),
}

/// Receiving half of a change subscription.
///
/// Dropping it ends the subscription.
#[derive(Debug)]
pub struct ChangeSubscription {
    receiver: broadcast::Receiver<LetterChange>,
}

impl ChangeSubscription {
    /// Wrap a broadcast receiver.
    pub fn new(receiver: broadcast::Receiver<LetterChange>) -> Self {
        Self { receiver }
    }

    /// Wait for the next notice. Returns `None` once the feed is closed.
    pub async fn next(&mut self) -> Option<ChangeNotice> {
        match self.receiver.recv().await {
            Ok(change) => Some(ChangeNotice::Changed(change)),
            Err(broadcast::error::RecvError::Lagged(missed)) => Some(ChangeNotice::Missed(missed)),
            Err(broadcast::error::RecvError::Closed) => None,
        }
    }
}

/// Publish/subscribe access to letter table changes.
pub trait LetterChanges: Send + Sync {
    /// Announce a confirmed write. Having no subscribers is not an error.
    fn publish(&self, change: LetterChange);

    /// Start a new subscription.
    fn subscribe(&self) -> ChangeSubscription;
}
