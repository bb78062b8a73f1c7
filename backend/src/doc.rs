//! The published OpenAPI document.
//!
//! Lists every route under `/api/v1` and `/health`, the schema wrappers for
//! domain types, and the admin cookie. Swagger UI serves it in debug builds;
//! the `openapi-dump` binary writes it out for client generation.

use crate::inbound::http::admin::{LetterListResponse, LoginRequest, ReadFlagRequest};
use crate::inbound::http::letters::{SubmitLetterRequest, SubmitLetterResponse};
use crate::inbound::http::schemas::{
    BehaviorSchema, ErrorCodeSchema, ErrorSchema, LetterSchema, TicketSchema,
};
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::openapi::{Components, OpenApi as Document};
use utoipa::{Modify, OpenApi};

const ADMIN_COOKIE_SCHEME: &str = "SessionCookie";

/// Declares the cookie set by a successful admin login.
struct AdminCookie;

impl Modify for AdminCookie {
    fn modify(&self, doc: &mut Document) {
        let cookie = ApiKeyValue::with_description(
            "session",
            "Set by POST /api/v1/admin/login, cleared by POST /api/v1/admin/logout.",
        );
        doc.components
            .get_or_insert_with(Components::default)
            .add_security_scheme(
                ADMIN_COOKIE_SCHEME,
                SecurityScheme::ApiKey(ApiKey::Cookie(cookie)),
            );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&AdminCookie),
    info(
        title = "Mailroom API",
        description = "Letters to Santa: submission, ticket lookup and the admin board."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::letters::submit_letter,
        crate::inbound::http::tickets::find_ticket,
        crate::inbound::http::admin::login,
        crate::inbound::http::admin::logout,
        crate::inbound::http::admin::list_letters,
        crate::inbound::http::admin::toggle_read,
        crate::inbound::http::admin::set_read,
        crate::inbound::http::admin::delete_letter,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        BehaviorSchema,
        LetterSchema,
        TicketSchema,
        SubmitLetterRequest,
        SubmitLetterResponse,
        LoginRequest,
        LetterListResponse,
        ReadFlagRequest,
    )),
    tags(
        (name = "letters", description = "Sending letters"),
        (name = "tickets", description = "Shipping tickets by phone number"),
        (name = "admin", description = "Santa's admin board"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};
    use utoipa::openapi::schema::{Schema, SchemaFormat};
    use utoipa::openapi::{RefOr, security::SecurityScheme};

    #[fixture]
    fn doc() -> Document {
        ApiDoc::openapi()
    }

    #[rstest]
    #[case("crate.domain.Error", "code")]
    #[case("crate.domain.Error", "traceId")]
    #[case("crate.domain.Letter", "wishlist")]
    #[case("crate.domain.Letter", "isRead")]
    #[case("crate.domain.Ticket", "ticketNumber")]
    fn domain_schemas_expose_wire_fields(doc: Document, #[case] name: &str, #[case] field: &str) {
        let components = doc.components.expect("components present");
        let Some(RefOr::T(Schema::Object(object))) = components.schemas.get(name) else {
            panic!("{name} is not registered as an object schema");
        };
        assert!(object.properties.contains_key(field), "{name} lacks {field}");
    }

    #[rstest]
    fn photo_address_is_documented_as_a_uri(doc: Document) {
        let components = doc.components.expect("components present");
        let Some(RefOr::T(Schema::Object(letter))) = components.schemas.get("crate.domain.Letter")
        else {
            panic!("crate.domain.Letter is not registered as an object schema");
        };
        let Some(RefOr::T(Schema::Object(image_url))) = letter.properties.get("imageUrl") else {
            panic!("imageUrl is not an inline schema");
        };
        assert_eq!(image_url.format, Some(SchemaFormat::Custom("uri".to_owned())));
    }

    #[rstest]
    #[case("/api/v1/letters")]
    #[case("/api/v1/tickets")]
    #[case("/api/v1/admin/login")]
    #[case("/api/v1/admin/logout")]
    #[case("/api/v1/admin/letters")]
    #[case("/api/v1/admin/letters/{id}/read-toggle")]
    #[case("/api/v1/admin/letters/{id}/read")]
    #[case("/api/v1/admin/letters/{id}")]
    #[case("/health/ready")]
    #[case("/health/live")]
    fn every_route_is_documented(doc: Document, #[case] path: &str) {
        assert!(doc.paths.paths.contains_key(path), "missing {path}");
    }

    #[rstest]
    fn admin_cookie_is_declared(doc: Document) {
        let components = doc.components.expect("components present");
        assert!(matches!(
            components.security_schemes.get(ADMIN_COOKIE_SCHEME),
            Some(SecurityScheme::ApiKey(ApiKey::Cookie(_)))
        ));
    }
}
