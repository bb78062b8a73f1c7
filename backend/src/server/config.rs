//! Listener address and admin cookie settings.

use std::net::SocketAddr;

use actix_session::config::{CookieContentSecurity, PersistentSession};
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::time::Duration;

use mailroom::inbound::http::session_config::SessionSettings;

/// How long an admin stays signed in without activity.
const ADMIN_SESSION_TTL: Duration = Duration::hours(2);

/// Everything the listener needs besides the wired ports.
#[derive(Clone)]
pub struct ServerConfig {
    session: SessionSettings,
    bind_addr: SocketAddr,
}

impl ServerConfig {
    #[must_use]
    pub fn new(session: SessionSettings, bind_addr: SocketAddr) -> Self {
        Self { session, bind_addr }
    }

    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }

    /// Encrypted, HTTP-only `session` cookie scoped to the whole site.
    pub(crate) fn session_middleware(&self) -> SessionMiddleware<CookieSessionStore> {
        let SessionSettings {
            key,
            cookie_secure,
            same_site,
        } = &self.session;
        SessionMiddleware::builder(CookieSessionStore::default(), key.clone())
            .cookie_name("session".to_owned())
            .cookie_path("/".to_owned())
            .cookie_http_only(true)
            .cookie_secure(*cookie_secure)
            .cookie_same_site(*same_site)
            .cookie_content_security(CookieContentSecurity::Private)
            .session_lifecycle(PersistentSession::default().session_ttl(ADMIN_SESSION_TTL))
            .build()
    }
}
