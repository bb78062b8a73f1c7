//! Port for the shared letters table.
use async_trait::async_trait;

use crate::domain::{Error, Letter, LetterId, NewLetter};

use super::define_port_error;

define_port_error! {
    /// Errors raised by letter table adapters.
    pub enum LetterRepositoryError {
        /// The backend could not be reached or timed out.
        Connection { message: String } => "letter store connection failed: {message}",
        /// The backend rejected or failed the query.
        Query { message: String } => "letter store query failed: {message}",
        /// The backend answered with a payload that is not a letter row.
        Decode { message: String } => "letter store returned an unreadable row: {message}",
        /// No row carries the given id.
        NotFound { id: LetterId } => "letter {id} not found",
    }
}

impl LetterRepositoryError {
    /// Collapse into the domain error surfaced to callers.
    ///
    /// Backend failures become a generic `service_unavailable`; the cause is
    /// kept out of client responses.
    pub fn into_domain(self, action: &str) -> Error {
        match self {
            Self::NotFound { id } => Error::not_found(format!("letter {id} not found")),
            other => {
                tracing::error!(error = %other, kind = other.kind(), action, "letter store call failed");
                Error::service_unavailable(format!("could not {action}; please try again"))
            }
        }
    }
}

/// Row access for letter records.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LetterRepository: Send + Sync {
    /// Insert one record and return it with backend-assigned fields.
    async fn insert(&self, letter: &NewLetter) -> Result<Letter, LetterRepositoryError>;

    /// All records, newest `created_at` first.
    async fn list_newest_first(&self) -> Result<Vec<Letter>, LetterRepositoryError>;

    /// Fetch a record by id.
    async fn find(&self, id: LetterId) -> Result<Option<Letter>, LetterRepositoryError>;

    /// Most recently created record whose phone equals `phone` exactly.
    async fn latest_by_phone(&self, phone: &str) -> Result<Option<Letter>, LetterRepositoryError>;

    /// Overwrite the read flag and return the updated record.
    async fn set_read(&self, id: LetterId, is_read: bool) -> Result<Letter, LetterRepositoryError>;

    /// Permanently remove a record.
    async fn delete(&self, id: LetterId) -> Result<(), LetterRepositoryError>;
}
