//! In-process change feed for the letters table.
//!
//! Services publish after the backend confirms a write; every admin live
//! session holds one subscription. Subscribers that fall behind see
//! [`ChangeNotice::Missed`](crate::domain::ports::ChangeNotice) and are
//! expected to re-fetch, which they do on every notice anyway.

use tokio::sync::broadcast;
use tracing::debug;

use crate::domain::ports::{ChangeSubscription, LetterChange, LetterChanges};

const CHANNEL_CAPACITY: usize = 16;

/// Broadcast-backed [`LetterChanges`].
#[derive(Debug, Clone)]
pub struct BroadcastLetterChanges {
    sender: broadcast::Sender<LetterChange>,
}

impl BroadcastLetterChanges {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { sender }
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for BroadcastLetterChanges {
    fn default() -> Self {
        Self::new()
    }
}

impl LetterChanges for BroadcastLetterChanges {
    fn publish(&self, change: LetterChange) {
        // No subscribers is fine: nobody is watching the board.
        let delivered = self.sender.send(change).unwrap_or(0);
        debug!(?change, delivered, "letter change published");
    }

    fn subscribe(&self) -> ChangeSubscription {
        ChangeSubscription::new(self.sender.subscribe())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::ChangeNotice;
    use tokio::time::{Duration, timeout};

    #[tokio::test]
    async fn every_subscriber_receives_each_change() {
        let feed = BroadcastLetterChanges::new();
        let mut first = feed.subscribe();
        let mut second = feed.subscribe();

        feed.publish(LetterChange::Delete);

        for subscription in [&mut first, &mut second] {
            let notice = timeout(Duration::from_millis(100), subscription.next())
                .await
                .expect("notice arrives");
            assert_eq!(notice, Some(ChangeNotice::Changed(LetterChange::Delete)));
        }
    }

    #[test]
    fn publishing_without_subscribers_is_harmless() {
        BroadcastLetterChanges::new().publish(LetterChange::Insert);
    }

    #[tokio::test]
    async fn clones_share_the_channel() {
        let feed = BroadcastLetterChanges::new();
        let mut subscription = feed.subscribe();

        feed.clone().publish(LetterChange::Update);

        let notice = timeout(Duration::from_millis(100), subscription.next())
            .await
            .expect("notice arrives");
        assert_eq!(notice, Some(ChangeNotice::Changed(LetterChange::Update)));
    }

    #[tokio::test]
    async fn slow_subscribers_are_told_they_missed_changes() {
        let feed = BroadcastLetterChanges::new();
        let mut subscription = feed.subscribe();

        for _ in 0..(CHANNEL_CAPACITY + 4) {
            feed.publish(LetterChange::Insert);
        }

        let notice = subscription.next().await;
        assert_eq!(notice, Some(ChangeNotice::Missed(4)));
    }

    #[test]
    fn dropping_a_subscription_ends_it() {
        let feed = BroadcastLetterChanges::new();
        let subscription = feed.subscribe();
        assert_eq!(feed.subscriber_count(), 1);
        drop(subscription);
        assert_eq!(feed.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn closed_feed_ends_the_subscription() {
        let feed = BroadcastLetterChanges::new();
        let mut subscription = feed.subscribe();
        drop(feed);
        assert_eq!(subscription.next().await, None);
    }
}
