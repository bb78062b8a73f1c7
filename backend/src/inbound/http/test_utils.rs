//! Test helpers for inbound HTTP components.

use std::sync::Arc;
use std::time::Duration;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::Key;
use mockable::DefaultClock;

use crate::domain::ports::{FixtureLoginService, ImmediateSleeper};
use crate::domain::{LetterAdminService, LetterSubmissionService, TicketLookupService};
use crate::inbound::http::state::{HttpState, HttpStatePorts};
use crate::outbound::change_feed::BroadcastLetterChanges;
use crate::test_support::InMemoryLetterStore;

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    test_session_middleware_with_key(Key::generate())
}

/// Like [`test_session_middleware`] but with a caller-supplied key, for
/// servers built once per worker that must accept each other's cookies.
pub fn test_session_middleware_with_key(key: Key) -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// HTTP state over one shared in-memory store, with the fixture admin
/// (`elf` / `hohoho`) and no sending pause.
pub fn test_state_over(store: Arc<InMemoryLetterStore>) -> HttpState {
    let changes = Arc::new(BroadcastLetterChanges::new());
    HttpState::new(HttpStatePorts {
        login: Arc::new(FixtureLoginService),
        submission: Arc::new(LetterSubmissionService::new(
            store.clone(),
            store.clone(),
            changes.clone(),
            Arc::new(DefaultClock),
        )),
        admin: Arc::new(LetterAdminService::new(store.clone(), changes)),
        tickets: Arc::new(TicketLookupService::new(store)),
    })
    .with_sending_delay(Duration::ZERO, Arc::new(ImmediateSleeper))
}

/// [`test_state_over`] an empty store.
pub fn test_state() -> HttpState {
    test_state_over(Arc::new(InMemoryLetterStore::new()))
}
