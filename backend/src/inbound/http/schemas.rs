//! OpenAPI schema definitions for domain types.
//!
//! Domain types stay framework-agnostic and do not derive `ToSchema`. The
//! wrappers here mirror their serialised shape and are registered under the
//! domain type's path.

use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    /// The request is malformed or fails validation.
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    /// Authentication failed or is missing.
    #[schema(rename = "unauthorized")]
    Unauthorized,
    /// Authenticated but not permitted to perform this action.
    #[schema(rename = "forbidden")]
    Forbidden,
    /// The requested resource does not exist.
    #[schema(rename = "not_found")]
    NotFound,
    /// The hosted backend or the server configuration is unavailable.
    #[schema(rename = "service_unavailable")]
    ServiceUnavailable,
    /// An unexpected error occurred on the server.
    #[schema(rename = "internal_error")]
    InternalError,
}

/// OpenAPI schema for [`crate::domain::Error`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Error)]
#[schema(rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ErrorSchema {
    /// Stable machine-readable error code.
    #[schema(example = "invalid_request")]
    code: ErrorCodeSchema,
    /// Human-readable message returned to clients.
    #[schema(example = "Please fill in your name and wishlist!")]
    message: String,
    /// Correlation identifier, also sent as the `trace-id` header.
    #[schema(example = "7c9e6679-7425-40de-944b-e07fc1f90ae7")]
    trace_id: Option<String>,
    /// Supplementary details such as the offending `field`.
    details: Option<serde_json::Value>,
}

/// OpenAPI schema for [`crate::domain::Behavior`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Behavior)]
pub enum BehaviorSchema {
    #[schema(rename = "nice")]
    Nice,
    #[schema(rename = "naughty")]
    Naughty,
}

/// OpenAPI schema for [`crate::domain::Letter`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Letter)]
#[schema(rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct LetterSchema {
    #[schema(value_type = String, format = Uuid)]
    id: String,
    #[schema(example = "Tom")]
    name: String,
    #[schema(minimum = 1, maximum = 120, example = 7)]
    age: Option<u8>,
    email: Option<String>,
    phone: Option<String>,
    behavior: BehaviorSchema,
    #[schema(example = "A red bike")]
    wishlist: String,
    #[schema(format = "uri")]
    image_url: Option<String>,
    is_read: bool,
    #[schema(value_type = String, format = DateTime)]
    created_at: String,
}

/// OpenAPI schema for [`crate::domain::Ticket`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Ticket)]
#[schema(rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct TicketSchema {
    #[schema(example = "ABCD1234")]
    ticket_number: String,
    name: String,
    behavior: BehaviorSchema,
    #[schema(example = "NICE ✓")]
    verdict: String,
    #[schema(example = "December 1, 2025")]
    letter_date: String,
    #[schema(example = "December 25th at Midnight")]
    delivery: String,
}
