//! Driving port for sending a letter.
use async_trait::async_trait;

use crate::domain::{Error, Letter, ValidLetter};

/// Runs the submission pipeline for one validated letter.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LetterSubmission: Send + Sync {
    /// Upload the optional photo, then insert the record.
    ///
    /// Any failure aborts the submission; no retry is attempted.
    async fn submit(&self, letter: ValidLetter, photo: Option<Vec<u8>>) -> Result<Letter, Error>;
}
