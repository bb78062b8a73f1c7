//! In-memory stand-in for the hosted backend's table and bucket.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::{TimeDelta, Utc};
use mockable::Clock;
use url::Url;
use uuid::Uuid;

use super::SteppingClock;
use crate::domain::photo::{BlobName, JpegPhoto};
use crate::domain::ports::{BlobStore, BlobStoreError, LetterRepository, LetterRepositoryError};
use crate::domain::{Letter, LetterId, NewLetter};

/// A call observed by the store, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    Upload(String),
    Insert,
    List,
    Find(LetterId),
    LatestByPhone(String),
    SetRead(LetterId, bool),
    Delete(LetterId),
}

/// Failure switches. Each makes the matching operations fail until cleared.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreFailures {
    pub upload: bool,
    pub insert: bool,
    pub reads: bool,
    pub updates: bool,
}

#[derive(Default)]
struct State {
    rows: Vec<Letter>,
    blobs: HashMap<String, Vec<u8>>,
    calls: Vec<StoreCall>,
    failures: StoreFailures,
}

/// Letters table plus photo bucket kept in memory.
pub struct InMemoryLetterStore {
    state: Mutex<State>,
    clock: Arc<dyn Clock>,
    public_base: Url,
}

impl Default for InMemoryLetterStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryLetterStore {
    /// Store whose clock starts now and advances one second per insert.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SteppingClock::new(Utc::now(), TimeDelta::seconds(1))))
    }

    /// Store stamping `created_at` from `clock`.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            state: Mutex::new(State::default()),
            clock,
            public_base: Url::parse("https://storage.test/letter-images/")
                .unwrap_or_else(|err| panic!("static base URL must parse: {err}")),
        }
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Add an existing row, bypassing the call log.
    pub fn seed(&self, letter: Letter) {
        self.lock().rows.push(letter);
    }

    /// Current rows in insertion order.
    pub fn rows(&self) -> Vec<Letter> {
        self.lock().rows.clone()
    }

    /// Names of stored blobs.
    pub fn blob_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.lock().blobs.keys().cloned().collect();
        names.sort();
        names
    }

    /// Bytes of a stored blob.
    pub fn blob(&self, name: &str) -> Option<Vec<u8>> {
        self.lock().blobs.get(name).cloned()
    }

    /// Calls observed so far.
    pub fn calls(&self) -> Vec<StoreCall> {
        self.lock().calls.clone()
    }

    /// Replace the failure switches.
    pub fn set_failures(&self, failures: StoreFailures) {
        self.lock().failures = failures;
    }

    fn record(&self, call: StoreCall) -> StoreFailures {
        let mut state = self.lock();
        state.calls.push(call);
        state.failures
    }
}

#[async_trait]
impl LetterRepository for InMemoryLetterStore {
    async fn insert(&self, letter: &NewLetter) -> Result<Letter, LetterRepositoryError> {
        if self.record(StoreCall::Insert).insert {
            return Err(LetterRepositoryError::query("insert rejected"));
        }
        let stored = Letter {
            id: LetterId::from_uuid(Uuid::new_v4()),
            name: letter.name().to_owned(),
            age: letter.age(),
            email: letter.email().map(str::to_owned),
            phone: letter.phone().map(str::to_owned),
            behavior: letter.behavior(),
            wishlist: letter.wishlist().to_owned(),
            image_url: letter.image_url().cloned(),
            is_read: false,
            created_at: self.clock.utc(),
        };
        self.lock().rows.push(stored.clone());
        Ok(stored)
    }

    async fn list_newest_first(&self) -> Result<Vec<Letter>, LetterRepositoryError> {
        if self.record(StoreCall::List).reads {
            return Err(LetterRepositoryError::connection("read failed"));
        }
        let mut rows = self.rows();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn find(&self, id: LetterId) -> Result<Option<Letter>, LetterRepositoryError> {
        if self.record(StoreCall::Find(id)).reads {
            return Err(LetterRepositoryError::connection("read failed"));
        }
        Ok(self.lock().rows.iter().find(|row| row.id == id).cloned())
    }

    async fn latest_by_phone(&self, phone: &str) -> Result<Option<Letter>, LetterRepositoryError> {
        if self.record(StoreCall::LatestByPhone(phone.to_owned())).reads {
            return Err(LetterRepositoryError::connection("read failed"));
        }
        Ok(self
            .lock()
            .rows
            .iter()
            .filter(|row| row.phone.as_deref() == Some(phone))
            .max_by_key(|row| row.created_at)
            .cloned())
    }

    async fn set_read(&self, id: LetterId, is_read: bool) -> Result<Letter, LetterRepositoryError> {
        if self.record(StoreCall::SetRead(id, is_read)).updates {
            return Err(LetterRepositoryError::query("update rejected"));
        }
        let mut state = self.lock();
        let row = state
            .rows
            .iter_mut()
            .find(|row| row.id == id)
            .ok_or_else(|| LetterRepositoryError::not_found(id))?;
        row.is_read = is_read;
        Ok(row.clone())
    }

    async fn delete(&self, id: LetterId) -> Result<(), LetterRepositoryError> {
        if self.record(StoreCall::Delete(id)).updates {
            return Err(LetterRepositoryError::query("delete rejected"));
        }
        let mut state = self.lock();
        let before = state.rows.len();
        state.rows.retain(|row| row.id != id);
        if state.rows.len() == before {
            return Err(LetterRepositoryError::not_found(id));
        }
        Ok(())
    }
}

#[async_trait]
impl BlobStore for InMemoryLetterStore {
    async fn upload(&self, name: &BlobName, photo: &JpegPhoto) -> Result<(), BlobStoreError> {
        if self.record(StoreCall::Upload(name.to_string())).upload {
            return Err(BlobStoreError::rejected("bucket unavailable"));
        }
        self.lock()
            .blobs
            .insert(name.to_string(), photo.as_bytes().to_vec());
        Ok(())
    }

    fn public_url(&self, name: &BlobName) -> Result<Url, BlobStoreError> {
        self.public_base
            .join(name.as_str())
            .map_err(|err| BlobStoreError::public_url(err.to_string()))
    }
}
