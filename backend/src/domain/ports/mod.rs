//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod blob_store;
mod letter_admin;
mod letter_changes;
mod letter_repository;
mod letter_submission;
mod login_service;
mod sleeper;
mod ticket_lookup;
mod video_source;

#[cfg(test)]
pub use blob_store::MockBlobStore;
pub use blob_store::{BlobStore, BlobStoreError};
#[cfg(test)]
pub use letter_admin::MockLetterAdmin;
pub use letter_admin::LetterAdmin;
pub use letter_changes::{ChangeNotice, ChangeSubscription, LetterChange, LetterChanges};
#[cfg(test)]
pub use letter_repository::MockLetterRepository;
pub use letter_repository::{LetterRepository, LetterRepositoryError};
#[cfg(test)]
pub use letter_submission::MockLetterSubmission;
pub use letter_submission::LetterSubmission;
pub use login_service::{FixtureLoginService, LoginService};
pub use sleeper::{ImmediateSleeper, Sleeper, TokioSleeper};
#[cfg(test)]
pub use ticket_lookup::MockTicketLookup;
pub use ticket_lookup::TicketLookup;
pub use video_source::{CameraError, FacingMode, VideoConstraints, VideoSource, VideoStream};
