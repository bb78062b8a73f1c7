//! Wire-level message definitions for the admin live board.
//!
//! The server only ever sends whole snapshots; clients replace their copy of
//! the table on each one.

use serde::{Deserialize, Serialize};

use crate::domain::Letter;
use crate::domain::ports::{ChangeNotice, LetterChange};

/// Why a snapshot was sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SnapshotCause {
    /// First snapshot after the upgrade.
    Connected,
    Insert,
    Update,
    Delete,
    /// Notifications were dropped; the snapshot catches up.
    Missed,
    /// The client asked for a refresh.
    Requested,
}

impl From<ChangeNotice> for SnapshotCause {
    fn from(value: ChangeNotice) -> Self {
        match value {
            ChangeNotice::Changed(LetterChange::Insert) => Self::Insert,
            ChangeNotice::Changed(LetterChange::Update) => Self::Update,
            ChangeNotice::Changed(LetterChange::Delete) => Self::Delete,
            ChangeNotice::Missed(_) => Self::Missed,
        }
    }
}

/// Outbound payloads.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ServerMessage {
    /// The full table, newest first.
    Snapshot {
        cause: SnapshotCause,
        total: usize,
        letters: Vec<Letter>,
    },
    /// A re-fetch failed; `letters` is the last table that loaded.
    RefreshFailed {
        message: String,
        total: usize,
        letters: Vec<Letter>,
    },
}

impl ServerMessage {
    pub fn snapshot(cause: SnapshotCause, letters: Vec<Letter>) -> Self {
        Self::Snapshot {
            cause,
            total: letters.len(),
            letters,
        }
    }

    pub fn refresh_failed(message: impl Into<String>, retained: Vec<Letter>) -> Self {
        Self::RefreshFailed {
            message: message.into(),
            total: retained.len(),
            letters: retained,
        }
    }
}

/// Inbound payloads.
#[derive(Debug, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ClientMessage {
    /// Ask for a fresh snapshot.
    Refresh,
}
