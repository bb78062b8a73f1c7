//! Ticket lookup by phone number.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use tracing::warn;

use crate::domain::ports::{LetterRepository, TicketLookup};
use crate::domain::{Behavior, Error, Letter};

/// Delivery promise printed on every ticket.
pub const DELIVERY_LINE: &str = "December 25th at Midnight";

/// Headline shown when no ticket matches.
pub const TICKET_NOT_FOUND_TITLE: &str = "No letter found";

/// Detail shown when no ticket matches.
pub const TICKET_NOT_FOUND_MESSAGE: &str = "We couldn't find a letter with this phone number.";

/// Shipping ticket shown to a sender.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    /// First eight characters of the letter id, uppercased.
    pub ticket_number: String,
    pub name: String,
    pub behavior: Behavior,
    pub verdict: String,
    /// `Month D, YYYY`.
    pub letter_date: String,
    pub delivery: String,
}

impl Ticket {
    /// Render the ticket for a stored letter.
    ///
    /// # Examples
    /// ```
    /// use chrono::{TimeZone, Utc};
    /// use mailroom::domain::{Behavior, Letter, LetterId, Ticket};
    /// use uuid::Uuid;
    ///
    /// let letter = Letter {
    ///     id: LetterId::from_uuid(Uuid::nil()),
    ///     name: "Tom".into(),
    ///     age: None,
    ///     email: None,
    ///     phone: Some("555-0100".into()),
    ///     behavior: Behavior::Naughty,
    ///     wishlist: "a kite".into(),
    ///     image_url: None,
    ///     is_read: false,
    ///     created_at: Utc.with_ymd_and_hms(2025, 12, 1, 9, 0, 0).unwrap(),
    /// };
    /// let ticket = Ticket::for_letter(&letter);
    /// assert_eq!(ticket.ticket_number, "00000000");
    /// assert_eq!(ticket.verdict, "NAUGHTY (but forgiven)");
    /// assert_eq!(ticket.letter_date, "December 1, 2025");
    /// ```
    pub fn for_letter(letter: &Letter) -> Self {
        Self {
            ticket_number: letter.id.ticket_number(),
            name: letter.name.clone(),
            behavior: letter.behavior,
            verdict: verdict(letter.behavior).to_owned(),
            letter_date: letter.created_at.format("%B %-d, %Y").to_string(),
            delivery: DELIVERY_LINE.to_owned(),
        }
    }
}

fn verdict(behavior: Behavior) -> &'static str {
    match behavior {
        Behavior::Nice => "NICE ✓",
        Behavior::Naughty => "NAUGHTY (but forgiven)",
    }
}

/// Result of a lookup. A miss is an outcome, not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TicketOutcome {
    Found(Ticket),
    NotFound,
}

/// Domain service implementing [`TicketLookup`].
#[derive(Clone)]
pub struct TicketLookupService {
    letters: Arc<dyn LetterRepository>,
}

impl TicketLookupService {
    pub fn new(letters: Arc<dyn LetterRepository>) -> Self {
        Self { letters }
    }
}

#[async_trait]
impl TicketLookup for TicketLookupService {
    async fn find_ticket(&self, phone: &str) -> Result<TicketOutcome, Error> {
        let phone = phone.trim();
        if phone.is_empty() {
            return Err(Error::invalid_request("Enter phone number").for_field("phone"));
        }
        match self.letters.latest_by_phone(phone).await {
            Ok(Some(letter)) => Ok(TicketOutcome::Found(Ticket::for_letter(&letter))),
            Ok(None) => Ok(TicketOutcome::NotFound),
            Err(err) => {
                warn!(error = %err, "ticket lookup failed; reporting no match");
                Ok(TicketOutcome::NotFound)
            }
        }
    }
}
