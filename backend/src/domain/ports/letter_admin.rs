//! Driving port for the admin board.
use async_trait::async_trait;

use crate::domain::{Error, Letter, LetterId};

use super::ChangeSubscription;

/// Admin reads, mutations and live updates.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LetterAdmin: Send + Sync {
    /// Every letter, newest first.
    async fn letters(&self) -> Result<Vec<Letter>, Error>;

    /// Flip the read flag of one letter.
    async fn toggle_read(&self, id: LetterId) -> Result<Letter, Error>;

    /// Set the read flag of one letter.
    async fn set_read(&self, id: LetterId, is_read: bool) -> Result<Letter, Error>;

    /// Permanently delete one letter.
    async fn delete(&self, id: LetterId) -> Result<(), Error>;

    /// Subscribe to table changes.
    fn subscribe(&self) -> ChangeSubscription;
}
