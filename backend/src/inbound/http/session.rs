//! Admin sign-in state carried in the session cookie.
//!
//! Handlers take a [`SessionContext`] extractor and never touch
//! `actix_session` directly.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;
use tracing::{debug, warn};

use crate::domain::{AdminId, Error};

pub(crate) const ADMIN_KEY: &str = "mailroom.admin";

/// The signed-in admin, if any, for the current request.
#[derive(Clone)]
pub struct SessionContext {
    inner: Session,
}

impl SessionContext {
    pub fn new(inner: Session) -> Self {
        Self { inner }
    }

    /// Sign `admin` in. The session id is rotated first.
    pub fn persist_admin(&self, admin: &AdminId) -> Result<(), Error> {
        self.inner.renew();
        self.inner
            .insert(ADMIN_KEY, admin.as_ref())
            .map_err(|err| {
                Error::internal(format!("could not write admin session: {err}"))
            })?;
        debug!(admin = %admin, "admin session stored");
        Ok(())
    }

    /// The signed-in admin. A blank stored id counts as signed out.
    pub fn admin_id(&self) -> Result<Option<AdminId>, Error> {
        let stored = self
            .inner
            .get::<String>(ADMIN_KEY)
            .map_err(|err| {
                Error::internal(format!("could not read admin session: {err}"))
            })?;
        Ok(stored.and_then(|raw| {
            AdminId::new(raw)
                .inspect_err(|_| warn!("ignoring blank admin id in session"))
                .ok()
        }))
    }

    /// Fails with `unauthorized` unless an admin is signed in.
    pub fn require_admin(&self) -> Result<AdminId, Error> {
        match self.admin_id()? {
            Some(admin) => Ok(admin),
            None => Err(Error::unauthorized("Please log in to read the letters.")),
        }
    }

    /// Sign out; the response expires the cookie.
    pub fn clear(&self) {
        self.inner.purge();
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let session = Session::from_request(req, payload);
        Box::pin(async move { Ok(Self::new(session.await?)) })
    }
}
