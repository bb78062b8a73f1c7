//! WebSocket-focused test helpers.
//!
//! Integration tests under `backend/tests/` compile as separate crates, so
//! sharing small WebSocket setup helpers helps avoid copy/paste drift.

use mailroom::inbound::http::state::HttpState;
use mailroom::inbound::ws::state::{OriginAllowList, WsState};
use url::Url;

/// Origin configured for the deployed admin page in these tests.
pub const ADMIN_ORIGIN: &str = "https://santa.example";

/// Build a `WsState` sharing the admin port of `http`, allowing
/// [`ADMIN_ORIGIN`] and `http://localhost:<port>`.
pub fn ws_state(http: &HttpState) -> WsState {
    let origins = OriginAllowList::new([Url::parse(ADMIN_ORIGIN).expect("valid origin")])
        .with_localhost(true);
    WsState::new(http.admin.clone(), origins)
}
