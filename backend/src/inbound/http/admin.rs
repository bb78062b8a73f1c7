//! Admin board endpoints.
//!
//! ```text
//! POST   /api/v1/admin/login {"username":"santa","password":"..."}
//! POST   /api/v1/admin/logout
//! GET    /api/v1/admin/letters?search=om&behavior=nice&status=unread&sort=oldest
//! POST   /api/v1/admin/letters/{id}/read-toggle
//! PUT    /api/v1/admin/letters/{id}/read {"isRead":true}
//! DELETE /api/v1/admin/letters/{id}
//! ```

use std::str::FromStr;

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

use crate::domain::{
    BehaviorFilter, Error, FilterParseError, LETTER_DELETED_MESSAGE, Letter, LetterFilter,
    LetterId, LoginCredentials, LoginValidationError, ReadFilter, SortOrder,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{ErrorSchema, LetterSchema};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Login request body for `POST /api/v1/admin/login`.
#[derive(Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

impl TryFrom<LoginRequest> for LoginCredentials {
    type Error = LoginValidationError;

    fn try_from(value: LoginRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(&value.username, &value.password)
    }
}

fn map_login_validation_error(err: LoginValidationError) -> Error {
    let field = match err {
        LoginValidationError::EmptyUsername => "username",
        LoginValidationError::EmptyPassword => "password",
    };
    Error::invalid_request(err.to_string()).for_field(field)
}

/// Authenticate an admin and establish a session.
#[utoipa::path(
    post,
    path = "/api/v1/admin/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Invalid credentials", body = ErrorSchema),
        (status = 500, description = "Internal server error")
    ),
    tags = ["admin"],
    operation_id = "adminLogin",
    security([])
)]
#[post("/admin/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let credentials =
        LoginCredentials::try_from(payload.into_inner()).map_err(map_login_validation_error)?;
    let admin = state.login.authenticate(&credentials).await?;
    session.persist_admin(&admin)?;
    Ok(HttpResponse::Ok().finish())
}

/// End the admin session.
#[utoipa::path(
    post,
    path = "/api/v1/admin/logout",
    responses((status = 204, description = "Session cleared")),
    tags = ["admin"],
    operation_id = "adminLogout"
)]
#[post("/admin/logout")]
pub async fn logout(session: SessionContext) -> HttpResponse {
    session.clear();
    HttpResponse::NoContent().finish()
}

/// Query for `GET /api/v1/admin/letters`. Every field is optional.
#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[serde(default)]
pub struct LetterListQuery {
    /// Case-insensitive substring of the sender's name.
    pub search: Option<String>,
    /// `all`, `nice` or `naughty`.
    pub behavior: Option<String>,
    /// `all`, `read` or `unread`.
    pub status: Option<String>,
    /// `newest` (default) or `oldest`.
    pub sort: Option<String>,
}

fn parse_keyword<T>(raw: Option<&str>, field: &str) -> Result<T, Error>
where
    T: FromStr<Err = FilterParseError> + Default,
{
    match raw.map(str::trim) {
        None | Some("") => Ok(T::default()),
        Some(value) => value.parse().map_err(|err: FilterParseError| {
            Error::invalid_request(err.to_string()).for_field(field)
        }),
    }
}

impl TryFrom<LetterListQuery> for LetterFilter {
    type Error = Error;

    fn try_from(query: LetterListQuery) -> Result<Self, Self::Error> {
        Ok(Self {
            behavior: parse_keyword::<BehaviorFilter>(query.behavior.as_deref(), "behavior")?,
            read: parse_keyword::<ReadFilter>(query.status.as_deref(), "status")?,
            sort: parse_keyword::<SortOrder>(query.sort.as_deref(), "sort")?,
            search: query.search.unwrap_or_default(),
        })
    }
}

/// Filtered view of the letters table.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LetterListResponse {
    /// Letters in the whole table, before filtering.
    pub total: usize,
    #[schema(value_type = Vec<LetterSchema>)]
    pub letters: Vec<Letter>,
}

/// List letters matching the given filters.
#[utoipa::path(
    get,
    path = "/api/v1/admin/letters",
    params(LetterListQuery),
    responses(
        (status = 200, description = "Filtered letters", body = LetterListResponse),
        (status = 400, description = "Unknown filter keyword", body = ErrorSchema),
        (status = 401, description = "Login required", body = ErrorSchema),
        (status = 503, description = "Backend unavailable", body = ErrorSchema)
    ),
    tags = ["admin"],
    operation_id = "listLetters"
)]
#[get("/admin/letters")]
pub async fn list_letters(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<LetterListQuery>,
) -> ApiResult<web::Json<LetterListResponse>> {
    session.require_admin()?;
    let filter = LetterFilter::try_from(query.into_inner())?;
    let letters = state.admin.letters().await?;
    Ok(web::Json(LetterListResponse {
        total: letters.len(),
        letters: filter.apply(&letters),
    }))
}

fn parse_id(raw: &str) -> Result<LetterId, Error> {
    raw.parse().map_err(|_| {
        Error::invalid_request(format!("'{raw}' is not a letter id")).for_field("id")
    })
}

/// Flip the read flag of one letter.
#[utoipa::path(
    post,
    path = "/api/v1/admin/letters/{id}/read-toggle",
    params(("id" = String, Path, description = "Letter id")),
    responses(
        (status = 200, description = "Updated letter", body = LetterSchema),
        (status = 401, description = "Login required", body = ErrorSchema),
        (status = 404, description = "No such letter", body = ErrorSchema),
        (status = 503, description = "Backend unavailable", body = ErrorSchema)
    ),
    tags = ["admin"],
    operation_id = "toggleLetterRead"
)]
#[post("/admin/letters/{id}/read-toggle")]
pub async fn toggle_read(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<Letter>> {
    let admin = session.require_admin()?;
    let id = parse_id(&path)?;
    let letter = state.admin.toggle_read(id).await?;
    info!(admin = %admin, letter_id = %id, is_read = letter.is_read, "read flag toggled");
    Ok(web::Json(letter))
}

/// Body for `PUT /api/v1/admin/letters/{id}/read`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReadFlagRequest {
    pub is_read: bool,
}

/// Set the read flag of one letter.
#[utoipa::path(
    put,
    path = "/api/v1/admin/letters/{id}/read",
    params(("id" = String, Path, description = "Letter id")),
    request_body = ReadFlagRequest,
    responses(
        (status = 200, description = "Updated letter", body = LetterSchema),
        (status = 401, description = "Login required", body = ErrorSchema),
        (status = 404, description = "No such letter", body = ErrorSchema),
        (status = 503, description = "Backend unavailable", body = ErrorSchema)
    ),
    tags = ["admin"],
    operation_id = "setLetterRead"
)]
#[put("/admin/letters/{id}/read")]
pub async fn set_read(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<ReadFlagRequest>,
) -> ApiResult<web::Json<Letter>> {
    session.require_admin()?;
    let id = parse_id(&path)?;
    let letter = state.admin.set_read(id, payload.is_read).await?;
    Ok(web::Json(letter))
}

/// Permanently delete one letter.
#[utoipa::path(
    delete,
    path = "/api/v1/admin/letters/{id}",
    params(("id" = String, Path, description = "Letter id")),
    responses(
        (status = 200, description = "Letter deleted"),
        (status = 401, description = "Login required", body = ErrorSchema),
        (status = 404, description = "No such letter", body = ErrorSchema),
        (status = 503, description = "Backend unavailable", body = ErrorSchema)
    ),
    tags = ["admin"],
    operation_id = "deleteLetter"
)]
#[delete("/admin/letters/{id}")]
pub async fn delete_letter(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let admin = session.require_admin()?;
    let id = parse_id(&path)?;
    state.admin.delete(id).await?;
    info!(admin = %admin, letter_id = %id, "letter deleted by admin");
    Ok(HttpResponse::Ok().json(json!({ "message": LETTER_DELETED_MESSAGE })))
}
