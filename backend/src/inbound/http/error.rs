//! Domain errors as HTTP responses.
//!
//! Every failure leaves as `{code, message, traceId?, details?}` JSON with a
//! status picked from the code. Internal errors lose their message and
//! details on the way out.

use actix_web::error::{JsonPayloadError, QueryPayloadError};
use actix_web::{HttpRequest, HttpResponse, ResponseError, http::StatusCode};
use serde_json::json;
use tracing::error;

use crate::domain::{Error, ErrorCode, TRACE_ID_HEADER};

pub use crate::domain::ApiResult;

const INTERNAL_MESSAGE: &str = "Internal server error";

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        match self.code() {
            ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
            ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorCode::Forbidden => StatusCode::FORBIDDEN,
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let mut response = HttpResponse::build(self.status_code());
        if let Some(id) = self.trace_id() {
            response.insert_header((TRACE_ID_HEADER, id.to_string()));
        }
        if self.code() == ErrorCode::InternalError {
            error!(error = %self, "internal error redacted from response");
            let mut public = Error::internal(INTERNAL_MESSAGE);
            if let Some(id) = self.trace_id() {
                public = public.with_trace_id(id);
            }
            return response.json(public);
        }
        response.json(self)
    }
}

impl From<actix_web::Error> for Error {
    fn from(err: actix_web::Error) -> Self {
        error!(error = %err, "framework error promoted to domain error");
        Self::internal(INTERNAL_MESSAGE)
    }
}

/// Malformed JSON bodies become `invalid_request`.
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    Error::invalid_request("request body is not valid JSON")
        .with_details(json!({ "reason": err.to_string() }))
        .into()
}

/// Malformed query strings become `invalid_request`.
pub fn query_error_handler(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    Error::invalid_request("query string is not valid")
        .with_details(json!({ "reason": err.to_string() }))
        .into()
}
