//! Admin board: filtering, sorting and mutations over the letters table.
//!
//! Filtering is pure and runs over an in-memory copy of the table. The copy
//! is only replaced after a successful fetch, and every change notification
//! triggers a full re-fetch rather than an incremental patch.

use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::domain::ports::{
    ChangeSubscription, LetterAdmin, LetterChange, LetterChanges, LetterRepository,
};
use crate::domain::{Behavior, Error, Letter, LetterId};

/// Behaviour filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BehaviorFilter {
    #[default]
    All,
    Nice,
    Naughty,
}

impl BehaviorFilter {
    fn matches(self, behavior: Behavior) -> bool {
        match self {
            Self::All => true,
            Self::Nice => behavior == Behavior::Nice,
            Self::Naughty => behavior == Behavior::Naughty,
        }
    }
}

/// Read-status filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReadFilter {
    #[default]
    All,
    Read,
    Unread,
}

impl ReadFilter {
    fn matches(self, is_read: bool) -> bool {
        match self {
            Self::All => true,
            Self::Read => is_read,
            Self::Unread => !is_read,
        }
    }
}

/// Ordering by `created_at`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Newest,
    Oldest,
}

/// Raised for an unknown filter keyword.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} '{value}'")]
pub struct FilterParseError {
    kind: &'static str,
    value: String,
}

macro_rules! keyword_from_str {
    ($ty:ty, $kind:literal, { $($word:literal => $variant:expr),+ $(,)? }) => {
        impl FromStr for $ty {
            type Err = FilterParseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_ascii_lowercase().as_str() {
                    $($word => Ok($variant),)+
                    _ => Err(FilterParseError { kind: $kind, value: s.to_owned() }),
                }
            }
        }
    };
}

keyword_from_str!(BehaviorFilter, "behavior filter", {
    "all" => Self::All,
    "nice" => Self::Nice,
    "naughty" => Self::Naughty,
});
keyword_from_str!(ReadFilter, "read filter", {
    "all" => Self::All,
    "read" => Self::Read,
    "unread" => Self::Unread,
});
keyword_from_str!(SortOrder, "sort order", {
    "newest" => Self::Newest,
    "oldest" => Self::Oldest,
});

/// View settings of the admin board. Every criterion is optional and they
/// combine conjunctively.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LetterFilter {
    /// Case-insensitive substring of the sender's name. Empty matches all.
    pub search: String,
    pub behavior: BehaviorFilter,
    pub read: ReadFilter,
    pub sort: SortOrder,
}

impl LetterFilter {
    /// Whether a single letter passes every criterion.
    pub fn matches(&self, letter: &Letter) -> bool {
        let needle = self.search.to_lowercase();
        self.matches_with(&needle, letter)
    }

    fn matches_with(&self, needle: &str, letter: &Letter) -> bool {
        (needle.is_empty() || letter.name.to_lowercase().contains(needle))
            && self.behavior.matches(letter.behavior)
            && self.read.matches(letter.is_read)
    }

    /// Filter and sort `letters` without touching the input.
    ///
    /// The sort is stable: letters with identical timestamps keep their
    /// input order.
    ///
    /// # Examples
    /// ```
    /// use mailroom::domain::LetterFilter;
    ///
    /// let view = LetterFilter::default().apply(&[]);
    /// assert!(view.is_empty());
    /// ```
    pub fn apply(&self, letters: &[Letter]) -> Vec<Letter> {
        let needle = self.search.to_lowercase();
        let mut view: Vec<Letter> = letters
            .iter()
            .filter(|letter| self.matches_with(&needle, letter))
            .cloned()
            .collect();
        match self.sort {
            SortOrder::Newest => view.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
            SortOrder::Oldest => view.sort_by(|a, b| a.created_at.cmp(&b.created_at)),
        }
        view
    }
}

/// In-memory copy of the letters table held by one admin session.
#[derive(Debug, Default, Clone)]
pub struct AdminBoard {
    letters: Vec<Letter>,
}

impl AdminBoard {
    /// Empty board; call [`AdminBoard::refresh`] to populate it.
    pub fn new() -> Self {
        Self::default()
    }

    /// Re-fetch the full table. On failure the previous records are kept.
    pub async fn refresh(&mut self, admin: &dyn LetterAdmin) -> Result<(), Error> {
        self.letters = admin.letters().await?;
        Ok(())
    }

    /// Records as last fetched, newest first.
    pub fn letters(&self) -> &[Letter] {
        &self.letters
    }

    /// Filtered and sorted view.
    pub fn visible(&self, filter: &LetterFilter) -> Vec<Letter> {
        filter.apply(&self.letters)
    }
}

/// Message reported after a successful delete.
pub const LETTER_DELETED_MESSAGE: &str = "Letter deleted";

/// Domain service implementing [`LetterAdmin`].
#[derive(Clone)]
pub struct LetterAdminService {
    letters: Arc<dyn LetterRepository>,
    changes: Arc<dyn LetterChanges>,
}

impl LetterAdminService {
    pub fn new(letters: Arc<dyn LetterRepository>, changes: Arc<dyn LetterChanges>) -> Self {
        Self { letters, changes }
    }
}

#[async_trait]
impl LetterAdmin for LetterAdminService {
    async fn letters(&self) -> Result<Vec<Letter>, Error> {
        self.letters
            .list_newest_first()
            .await
            .map_err(|err| err.into_domain("load letters"))
    }

    async fn toggle_read(&self, id: LetterId) -> Result<Letter, Error> {
        let current = self
            .letters
            .find(id)
            .await
            .map_err(|err| err.into_domain("load the letter"))?
            .ok_or_else(|| Error::not_found(format!("letter {id} not found")))?;
        self.set_read(id, !current.is_read).await
    }

    async fn set_read(&self, id: LetterId, is_read: bool) -> Result<Letter, Error> {
        let updated = self
            .letters
            .set_read(id, is_read)
            .await
            .map_err(|err| err.into_domain("update the letter"))?;
        info!(letter_id = %id, is_read, "letter read flag updated");
        self.changes.publish(LetterChange::Update);
        Ok(updated)
    }

    async fn delete(&self, id: LetterId) -> Result<(), Error> {
        self.letters
            .delete(id)
            .await
            .map_err(|err| err.into_domain("delete the letter"))?;
        info!(letter_id = %id, "letter deleted");
        self.changes.publish(LetterChange::Delete);
        Ok(())
    }

    fn subscribe(&self) -> ChangeSubscription {
        self.changes.subscribe()
    }
}
