//! Letter records and the draft validation guarding every submission.
//!
//! A [`LetterDraft`] is whatever the child typed in. [`LetterDraft::validate`]
//! is the only way to obtain a [`ValidLetter`], so the pipeline can never send
//! a record with a blank name or wishlist to the backend.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;
use uuid::Uuid;

/// Backend-generated identifier of a letter record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LetterId(Uuid);

impl LetterId {
    /// Wrap an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Access the inner UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// Cosmetic ticket number: the first eight characters of the id, uppercased.
    ///
    /// Not unique in its truncated form.
    ///
    /// # Examples
    /// ```
    /// use mailroom::domain::LetterId;
    ///
    /// let id: LetterId = "3fa85f64-5717-4562-b3fc-2c963f66afa6".parse().unwrap();
    /// assert_eq!(id.ticket_number(), "3FA85F64");
    /// ```
    #[must_use]
    pub fn ticket_number(&self) -> String {
        self.0
            .hyphenated()
            .to_string()
            .chars()
            .take(8)
            .collect::<String>()
            .to_uppercase()
    }
}

impl fmt::Display for LetterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for LetterId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Self-declared behaviour for the year. Cosmetic only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Behavior {
    /// The default.
    #[default]
    Nice,
    /// Naughty, but forgiven.
    Naughty,
}

impl Behavior {
    /// Wire and storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Nice => "nice",
            Self::Naughty => "naughty",
        }
    }
}

impl fmt::Display for Behavior {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised when a behaviour string is neither `nice` nor `naughty`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown behavior '{0}'; expected nice or naughty")]
pub struct BehaviorParseError(String);

impl FromStr for Behavior {
    type Err = BehaviorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "nice" => Ok(Self::Nice),
            "naughty" => Ok(Self::Naughty),
            _ => Err(BehaviorParseError(s.to_owned())),
        }
    }
}

/// A persisted letter as returned by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Letter {
    pub id: LetterId,
    pub name: String,
    pub age: Option<u8>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub behavior: Behavior,
    pub wishlist: String,
    pub image_url: Option<Url>,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

/// Raw form input prior to validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LetterDraft {
    pub name: String,
    pub age: Option<i64>,
    pub email: String,
    pub phone: String,
    pub behavior: Behavior,
    pub wishlist: String,
}

/// Reasons a draft cannot be sent.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LetterValidationError {
    /// Name was missing or blank once trimmed.
    #[error("name must not be empty")]
    EmptyName,
    /// Wishlist was missing or blank once trimmed.
    #[error("wishlist must not be empty")]
    EmptyWishlist,
    /// Age was outside the storable range.
    #[error("age must be between 0 and 255, got {0}")]
    AgeOutOfRange(i64),
}

impl LetterValidationError {
    /// Name of the offending form field.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::EmptyName => "name",
            Self::EmptyWishlist => "wishlist",
            Self::AgeOutOfRange(_) => "age",
        }
    }
}

fn optional_text(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}

impl LetterDraft {
    /// Check required fields and normalise optional ones.
    ///
    /// Text fields are trimmed; blank email or phone become absent.
    ///
    /// # Examples
    /// ```
    /// use mailroom::domain::{LetterDraft, LetterValidationError};
    ///
    /// let draft = LetterDraft {
    ///     name: "  ".into(),
    ///     wishlist: "a sled".into(),
    ///     ..LetterDraft::default()
    /// };
    /// assert_eq!(draft.validate(), Err(LetterValidationError::EmptyName));
    /// ```
    pub fn validate(&self) -> Result<ValidLetter, LetterValidationError> {
        let name = optional_text(&self.name).ok_or(LetterValidationError::EmptyName)?;
        let wishlist = optional_text(&self.wishlist).ok_or(LetterValidationError::EmptyWishlist)?;
        let age = self
            .age
            .map(|age| u8::try_from(age).map_err(|_| LetterValidationError::AgeOutOfRange(age)))
            .transpose()?;

        Ok(ValidLetter {
            name,
            age,
            email: optional_text(&self.email),
            phone: optional_text(&self.phone),
            behavior: self.behavior,
            wishlist,
        })
    }
}

/// A draft that passed validation.
///
/// ## Invariants
/// - `name` and `wishlist` are trimmed and non-empty.
/// - `email` and `phone` are trimmed and absent rather than blank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidLetter {
    name: String,
    age: Option<u8>,
    email: Option<String>,
    phone: Option<String>,
    behavior: Behavior,
    wishlist: String,
}

impl ValidLetter {
    /// Sender's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Attach the resolved photo address, producing the insert payload.
    #[must_use]
    pub fn into_new_letter(self, image_url: Option<Url>) -> NewLetter {
        NewLetter {
            letter: self,
            image_url,
        }
    }
}

/// Insert payload handed to the letter repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLetter {
    letter: ValidLetter,
    image_url: Option<Url>,
}

impl NewLetter {
    pub fn name(&self) -> &str {
        &self.letter.name
    }

    pub fn age(&self) -> Option<u8> {
        self.letter.age
    }

    pub fn email(&self) -> Option<&str> {
        self.letter.email.as_deref()
    }

    pub fn phone(&self) -> Option<&str> {
        self.letter.phone.as_deref()
    }

    pub fn behavior(&self) -> Behavior {
        self.letter.behavior
    }

    pub fn wishlist(&self) -> &str {
        &self.letter.wishlist
    }

    pub fn image_url(&self) -> Option<&Url> {
        self.image_url.as_ref()
    }
}
