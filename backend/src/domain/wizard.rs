//! The three-step submission wizard: compose, sending, sent.
//!
//! ```text
//! Compose --submit--> Sending --ok + delay--> Sent --reset--> Compose
//!                        \--failure--> Compose
//! ```
//!
//! Validation happens before leaving `Compose`, so an invalid draft never
//! reaches the pipeline. State changes are published on a watch channel.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing::{debug, warn};

use crate::domain::ports::{LetterSubmission, Sleeper};
use crate::domain::{Error, Letter, LetterDraft, LetterValidationError};

/// Pause between a confirmed insert and the `Sent` state, so the sending
/// animation can finish.
pub const DEFAULT_SENDING_DELAY: Duration = Duration::from_secs(2);

/// Shown when a required field is blank.
pub const MISSING_INFORMATION_MESSAGE: &str = "Please fill in your name and wishlist!";

/// Wizard step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WizardState {
    /// Editing the letter. Initial state.
    Compose,
    /// The pipeline is running.
    Sending,
    /// Delivered; carries the sender's name for the thank-you view.
    Sent { name: String },
}

/// Reasons a submit attempt did not reach `Sent`.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum WizardError {
    /// Another submission is still in flight.
    #[error("a letter is already on its way")]
    Busy,
    /// The wizard must be reset before a new letter can be sent.
    #[error("this letter was already sent")]
    AlreadySent,
    /// The draft failed validation; no network call was made.
    #[error(transparent)]
    Invalid(#[from] LetterValidationError),
    /// The pipeline failed; the wizard is back in `Compose`.
    #[error(transparent)]
    Failed(Error),
}

impl From<WizardError> for Error {
    fn from(value: WizardError) -> Self {
        match value {
            WizardError::Busy | WizardError::AlreadySent => {
                Error::invalid_request(value.to_string())
            }
            WizardError::Invalid(LetterValidationError::AgeOutOfRange(age)) => {
                Error::invalid_request(format!("age must be between 0 and 255, got {age}"))
                    .for_field("age")
            }
            WizardError::Invalid(invalid) => Error::invalid_request(MISSING_INFORMATION_MESSAGE)
                .for_field(invalid.field()),
            WizardError::Failed(error) => error,
        }
    }
}

/// Drives one letter from draft to delivery.
pub struct SubmissionWizard {
    pipeline: Arc<dyn LetterSubmission>,
    sleeper: Arc<dyn Sleeper>,
    sending_delay: Duration,
    state: watch::Sender<WizardState>,
}

impl SubmissionWizard {
    /// Start a wizard in `Compose`.
    pub fn new(
        pipeline: Arc<dyn LetterSubmission>,
        sleeper: Arc<dyn Sleeper>,
        sending_delay: Duration,
    ) -> Self {
        let (state, _) = watch::channel(WizardState::Compose);
        Self {
            pipeline,
            sleeper,
            sending_delay,
            state,
        }
    }

    /// Current step.
    pub fn state(&self) -> WizardState {
        self.state.borrow().clone()
    }

    /// Observe step changes.
    pub fn subscribe(&self) -> watch::Receiver<WizardState> {
        self.state.subscribe()
    }

    /// Validate and send `draft` with an optional photo.
    ///
    /// On failure the draft is untouched so the caller can resubmit it.
    pub async fn submit(
        &mut self,
        draft: &LetterDraft,
        photo: Option<Vec<u8>>,
    ) -> Result<Letter, WizardError> {
        match self.state() {
            WizardState::Compose => {}
            WizardState::Sending => return Err(WizardError::Busy),
            WizardState::Sent { .. } => return Err(WizardError::AlreadySent),
        }

        let letter = draft.validate()?;
        let name = letter.name().to_owned();
        self.state.send_replace(WizardState::Sending);

        match self.pipeline.submit(letter, photo).await {
            Ok(stored) => {
                self.sleeper.sleep(self.sending_delay).await;
                debug!(letter_id = %stored.id, "letter sent");
                self.state.send_replace(WizardState::Sent { name });
                Ok(stored)
            }
            Err(error) => {
                warn!(error = %error, "letter submission failed; back to compose");
                self.state.send_replace(WizardState::Compose);
                Err(WizardError::Failed(error))
            }
        }
    }

    /// Start over after a letter was sent. No-op in any other step.
    pub fn reset(&mut self) {
        if matches!(self.state(), WizardState::Sent { .. }) {
            self.state.send_replace(WizardState::Compose);
        }
    }
}
