//! What HTTP handlers get from `web::Data`.
//!
//! Only use-case ports live here, so handlers can be exercised against
//! in-memory stores or mocks.

use std::sync::Arc;
use std::time::Duration;

use crate::domain::DEFAULT_SENDING_DELAY;
use crate::domain::ports::{
    LetterAdmin, LetterSubmission, LoginService, Sleeper, TicketLookup, TokioSleeper,
};

/// The four use cases behind the REST API.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub login: Arc<dyn LoginService>,
    pub submission: Arc<dyn LetterSubmission>,
    pub admin: Arc<dyn LetterAdmin>,
    pub tickets: Arc<dyn TicketLookup>,
}

#[derive(Clone)]
pub struct HttpState {
    pub login: Arc<dyn LoginService>,
    pub submission: Arc<dyn LetterSubmission>,
    pub admin: Arc<dyn LetterAdmin>,
    pub tickets: Arc<dyn TicketLookup>,
    /// How long the wizard shows `sending` after the backend confirmed.
    pub sending_delay: Duration,
    pub sleeper: Arc<dyn Sleeper>,
}

impl HttpState {
    /// Wrap `ports`, pausing [`DEFAULT_SENDING_DELAY`] on the Tokio timer
    /// before a submission answers.
    ///
    /// ```
    /// use std::sync::Arc;
    ///
    /// use mailroom::domain::ports::FixtureLoginService;
    /// use mailroom::domain::{LetterAdminService, LetterSubmissionService, TicketLookupService};
    /// use mailroom::inbound::http::state::{HttpState, HttpStatePorts};
    /// use mailroom::outbound::change_feed::BroadcastLetterChanges;
    /// use mailroom::test_support::InMemoryLetterStore;
    /// use mockable::DefaultClock;
    ///
    /// let store = Arc::new(InMemoryLetterStore::new());
    /// let feed = Arc::new(BroadcastLetterChanges::new());
    /// let submission = LetterSubmissionService::new(
    ///     store.clone(),
    ///     store.clone(),
    ///     feed.clone(),
    ///     Arc::new(DefaultClock),
    /// );
    /// let state = HttpState::new(HttpStatePorts {
    ///     login: Arc::new(FixtureLoginService),
    ///     submission: Arc::new(submission),
    ///     admin: Arc::new(LetterAdminService::new(store.clone(), feed)),
    ///     tickets: Arc::new(TicketLookupService::new(store)),
    /// });
    /// assert_eq!(state.sending_delay.as_secs(), 2);
    /// ```
    pub fn new(ports: HttpStatePorts) -> Self {
        Self {
            login: ports.login,
            submission: ports.submission,
            admin: ports.admin,
            tickets: ports.tickets,
            sending_delay: DEFAULT_SENDING_DELAY,
            sleeper: Arc::new(TokioSleeper),
        }
    }

    /// Pause `delay` on `sleeper` instead.
    #[must_use]
    pub fn with_sending_delay(self, delay: Duration, sleeper: Arc<dyn Sleeper>) -> Self {
        Self {
            sending_delay: delay,
            sleeper,
            ..self
        }
    }
}
