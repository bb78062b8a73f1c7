//! Driving port for ticket lookups by phone number.
use async_trait::async_trait;

use crate::domain::{Error, TicketOutcome};

/// Finds the latest letter for a phone number.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TicketLookup: Send + Sync {
    /// Look up the ticket for `phone`.
    ///
    /// Only a blank phone is an error; a miss or backend failure is
    /// [`TicketOutcome::NotFound`].
    async fn find_ticket(&self, phone: &str) -> Result<TicketOutcome, Error>;
}
