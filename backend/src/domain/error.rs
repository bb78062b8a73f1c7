//! Failures reported to senders and admins.
//!
//! Transport agnostic: the HTTP adapter picks a status from [`ErrorCode`],
//! the live board turns errors into `refreshFailed` frames.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::TraceId;

/// Failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// Input failed validation; nothing was sent to the backend.
    InvalidRequest,
    /// No admin session, or wrong credentials.
    Unauthorized,
    Forbidden,
    /// The letter (or ticket) does not exist.
    NotFound,
    /// The hosted backend or the configuration is unavailable. Retrying later
    /// may succeed.
    ServiceUnavailable,
    /// A bug. Details are never shown to callers.
    InternalError,
}

impl ErrorCode {
    /// Wire name, as serialised.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InvalidRequest => "invalid_request",
            Self::Unauthorized => "unauthorized",
            Self::Forbidden => "forbidden",
            Self::NotFound => "not_found",
            Self::ServiceUnavailable => "service_unavailable",
            Self::InternalError => "internal_error",
        }
    }

    const fn fallback_message(self) -> &'static str {
        match self {
            Self::InvalidRequest => "invalid request",
            Self::Unauthorized => "login required",
            Self::Forbidden => "not allowed",
            Self::NotFound => "not found",
            Self::ServiceUnavailable => "service unavailable",
            Self::InternalError => "Internal server error",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A failure with a message fit for the person who caused it.
///
/// Built inside a request, it remembers that request's [`TraceId`].
///
/// ## Invariants
/// - `message` is non-empty once trimmed.
///
/// # Examples
/// ```
/// use mailroom::domain::{Error, ErrorCode};
///
/// let err = Error::invalid_request("Please fill in your name and wishlist!").for_field("name");
/// assert_eq!(err.code(), ErrorCode::InvalidRequest);
/// assert_eq!(err.details().and_then(|d| d["field"].as_str()), Some("name"));
/// ```
#[derive(Debug, Clone, PartialEq, thiserror::Error, Serialize, Deserialize)]
#[error("{message}")]
#[serde(try_from = "ErrorDto", into = "ErrorDto")]
pub struct Error {
    code: ErrorCode,
    message: String,
    trace_id: Option<TraceId>,
    details: Option<Value>,
}

/// Why an error payload could not be built.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ErrorValidationError {
    #[error("error message must not be empty")]
    EmptyMessage,
    #[error("trace id '{0}' is not a UUID")]
    InvalidTraceId(String),
}

impl Error {
    /// Build an error; a blank message is replaced by a generic one for the
    /// code.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::try_new(code, message).unwrap_or_else(|_| Self::bare(code, code.fallback_message()))
    }

    /// Build an error, rejecting a blank message.
    pub fn try_new(
        code: ErrorCode,
        message: impl Into<String>,
    ) -> Result<Self, ErrorValidationError> {
        let message = message.into();
        if message.trim().is_empty() {
            return Err(ErrorValidationError::EmptyMessage);
        }
        Ok(Self::bare(code, message))
    }

    fn bare(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            trace_id: TraceId::current(),
            details: None,
        }
    }

    pub fn code(&self) -> ErrorCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Request that produced the error, if it was built inside one.
    pub fn trace_id(&self) -> Option<TraceId> {
        self.trace_id
    }

    pub fn details(&self) -> Option<&Value> {
        self.details.as_ref()
    }

    /// Replace the structured details.
    #[must_use]
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Name the form field at fault, as `details.field`.
    #[must_use]
    pub fn for_field(self, field: &str) -> Self {
        self.with_details(json!({ "field": field }))
    }

    /// Pin the error to a specific request.
    #[must_use]
    pub fn with_trace_id(mut self, trace_id: TraceId) -> Self {
        self.trace_id = Some(trace_id);
        self
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidRequest, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Unauthorized, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Forbidden, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, message)
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ServiceUnavailable, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }
}

/// Wire form: `{code, message, traceId?, details?}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ErrorDto {
    code: ErrorCode,
    message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    trace_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
}

impl From<Error> for ErrorDto {
    fn from(error: Error) -> Self {
        Self {
            code: error.code,
            message: error.message,
            trace_id: error.trace_id.map(|id| id.to_string()),
            details: error.details,
        }
    }
}

impl TryFrom<ErrorDto> for Error {
    type Error = ErrorValidationError;

    fn try_from(dto: ErrorDto) -> Result<Self, Self::Error> {
        let mut error = Self::try_new(dto.code, dto.message)?;
        // A decoded payload keeps its own id, never the ambient one.
        error.trace_id = dto
            .trace_id
            .map(|raw| {
                raw.parse()
                    .map_err(|_| ErrorValidationError::InvalidTraceId(raw))
            })
            .transpose()?;
        error.details = dto.details;
        Ok(error)
    }
}
