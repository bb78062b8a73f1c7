//! Test doubles shared by unit tests (in `src/`) and integration tests (in
//! `tests/`). Compiled for tests and behind the `test-support` feature.

mod clock;
mod memory_store;

pub use clock::SteppingClock;
pub use memory_store::{InMemoryLetterStore, StoreCall, StoreFailures};

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{Behavior, Letter, LetterId};

/// Build a stored letter with the fields the admin views care about.
pub fn letter_fixture(
    name: &str,
    behavior: Behavior,
    is_read: bool,
    created_at: DateTime<Utc>,
) -> Letter {
    Letter {
        id: LetterId::from_uuid(Uuid::new_v4()),
        name: name.to_owned(),
        age: None,
        email: None,
        phone: None,
        behavior,
        wishlist: format!("{name}'s wishlist"),
        image_url: None,
        is_read,
        created_at,
    }
}
