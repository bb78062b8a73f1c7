//! Domain primitives, aggregates and services.
//!
//! Purpose: model letters to Santa and the flows around them (submission,
//! admin review, ticket lookup, selfie capture) without depending on HTTP
//! or the hosted backend. Adapters reach the domain through [`ports`].
//!
//! Public surface:
//! - Error (alias to `error::Error`) — API error response payload.
//! - ErrorCode (alias to `error::ErrorCode`) — stable error identifier.
//! - Letter, LetterDraft, LetterId, Behavior — the letter record and its input.
//! - LetterSubmissionService, SubmissionWizard — the send flow.
//! - LetterAdminService, AdminBoard, LetterFilter — the admin board.
//! - TicketLookupService, Ticket — the sender's shipping ticket.
//! - CameraCapture — selfie capture session.

pub mod admin;
pub mod auth;
pub mod camera;
pub mod error;
pub mod letter;
pub mod photo;
pub mod ports;
pub mod submission;
pub mod ticket;
pub mod trace_id;
pub mod wizard;

pub use self::admin::{
    AdminBoard, BehaviorFilter, FilterParseError, LETTER_DELETED_MESSAGE, LetterAdminService,
    LetterFilter, ReadFilter, SortOrder,
};
pub use self::auth::{AdminId, AdminIdError, LoginCredentials, LoginValidationError};
pub use self::camera::{
    CAMERA_ACCESS_MESSAGE, CameraCapture, CameraFailure, CaptureError, CaptureState,
};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::letter::{
    Behavior, BehaviorParseError, Letter, LetterDraft, LetterId, LetterValidationError, NewLetter,
    ValidLetter,
};
pub use self::submission::{LetterSubmissionService, SUBMISSION_FAILED_MESSAGE};
pub use self::ticket::{
    DELIVERY_LINE, TICKET_NOT_FOUND_MESSAGE, TICKET_NOT_FOUND_TITLE, Ticket, TicketLookupService,
    TicketOutcome,
};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::wizard::{
    DEFAULT_SENDING_DELAY, MISSING_INFORMATION_MESSAGE, SubmissionWizard, WizardError, WizardState,
};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use mailroom::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
