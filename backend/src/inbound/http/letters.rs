//! Letter submission endpoint.
//!
//! ```text
//! POST /api/v1/letters {"name":"Tom","wishlist":"a kite","behavior":"nice"}
//! ```
//!
//! Each request drives its own [`SubmissionWizard`], so the response is only
//! sent once the letter is stored and the sending pause has elapsed.

use actix_web::{HttpResponse, post, web};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::domain::{Behavior, Error, LetterDraft, SubmissionWizard, WizardState};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;

/// Body for `POST /api/v1/letters`.
///
/// `photo` is base64, optionally wrapped in a `data:image/...;base64,` URL.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct SubmitLetterRequest {
    #[schema(example = "Tom")]
    pub name: String,
    #[schema(example = 7)]
    pub age: Option<i64>,
    pub email: Option<String>,
    #[schema(example = "555-0100")]
    pub phone: Option<String>,
    /// `nice` (default) or `naughty`.
    #[schema(example = "nice")]
    pub behavior: Option<String>,
    #[schema(example = "A red kite and a sled")]
    pub wishlist: String,
    pub photo: Option<String>,
}

/// Answer once the letter is on its way.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmitLetterResponse {
    /// Always `sent`.
    #[schema(example = "sent")]
    pub state: String,
    #[schema(example = "Tom")]
    pub name: String,
}

impl SubmitLetterRequest {
    fn into_parts(self) -> Result<(LetterDraft, Option<Vec<u8>>), Error> {
        let behavior = match self.behavior.as_deref().map(str::trim) {
            None | Some("") => Behavior::default(),
            Some(raw) => raw.parse().map_err(|err: crate::domain::BehaviorParseError| {
                Error::invalid_request(err.to_string()).for_field("behavior")
            })?,
        };
        let photo = self.photo.as_deref().map(decode_photo).transpose()?.flatten();
        let draft = LetterDraft {
            name: self.name,
            age: self.age,
            email: self.email.unwrap_or_default(),
            phone: self.phone.unwrap_or_default(),
            behavior,
            wishlist: self.wishlist,
        };
        Ok((draft, photo))
    }
}

fn decode_photo(raw: &str) -> Result<Option<Vec<u8>>, Error> {
    let raw = raw.trim();
    let encoded = match raw.split_once(',') {
        Some((prefix, data)) if prefix.starts_with("data:") => data,
        _ => raw,
    };
    if encoded.is_empty() {
        return Ok(None);
    }
    STANDARD
        .decode(encoded)
        .map(Some)
        .map_err(|err| {
            Error::invalid_request("photo must be base64 encoded")
                .with_details(json!({ "field": "photo", "reason": err.to_string() }))
        })
}

/// Submit a letter to Santa.
///
/// Validation failures are reported before anything is stored. Backend
/// failures answer `503` and nothing is kept except, possibly, an uploaded
/// photo.
#[utoipa::path(
    post,
    path = "/api/v1/letters",
    request_body = SubmitLetterRequest,
    responses(
        (status = 201, description = "Letter sent", body = SubmitLetterResponse),
        (status = 400, description = "Missing name or wishlist, or unreadable photo", body = ErrorSchema),
        (status = 503, description = "Backend unavailable", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["letters"],
    operation_id = "submitLetter",
    security([])
)]
#[post("/letters")]
pub async fn submit_letter(
    state: web::Data<HttpState>,
    payload: web::Json<SubmitLetterRequest>,
) -> ApiResult<HttpResponse> {
    let (draft, photo) = payload.into_inner().into_parts()?;
    let mut wizard = SubmissionWizard::new(
        state.submission.clone(),
        state.sleeper.clone(),
        state.sending_delay,
    );
    wizard.submit(&draft, photo).await?;
    match wizard.state() {
        WizardState::Sent { name } => Ok(HttpResponse::Created().json(SubmitLetterResponse {
            state: "sent".to_owned(),
            name,
        })),
        other => Err(Error::internal(format!(
            "submission finished in unexpected state {other:?}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{ImmediateSleeper, MockLetterSubmission};
    use crate::domain::{Letter, LetterId, SUBMISSION_FAILED_MESSAGE};
    use crate::inbound::http::state::HttpStatePorts;
    use crate::inbound::http::test_utils::test_state;
    use actix_web::http::StatusCode;
    use actix_web::{App, test as actix_test};
    use chrono::Utc;
    use rstest::rstest;
    use serde_json::Value;
    use std::sync::Arc;
    use std::time::Duration;
    use uuid::Uuid;

    fn state_with(submission: MockLetterSubmission) -> HttpState {
        let HttpState {
            login,
            admin,
            tickets,
            ..
        } = test_state();
        HttpState::new(HttpStatePorts {
            login,
            submission: Arc::new(submission),
            admin,
            tickets,
        })
        .with_sending_delay(Duration::ZERO, Arc::new(ImmediateSleeper))
    }

    async fn post(state: HttpState, body: Value) -> (StatusCode, Value) {
        let app = actix_test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .app_data(crate::inbound::http::json_config())
                .service(web::scope("/api/v1").service(submit_letter)),
        )
        .await;
        let request = actix_test::TestRequest::post()
            .uri("/api/v1/letters")
            .set_json(&body)
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        let status = response.status();
        let body = actix_test::read_body(response).await;
        (status, serde_json::from_slice(&body).unwrap_or(Value::Null))
    }

    #[actix_web::test]
    async fn sends_a_valid_letter() {
        let mut submission = MockLetterSubmission::new();
        submission
            .expect_submit()
            .withf(|letter, photo| letter.name() == "Tom" && photo.is_none())
            .times(1)
            .returning(|letter, _| {
                let stored = letter.into_new_letter(None);
                Ok(Letter {
                    id: LetterId::from_uuid(Uuid::new_v4()),
                    name: stored.name().to_owned(),
                    age: stored.age(),
                    email: None,
                    phone: None,
                    behavior: stored.behavior(),
                    wishlist: stored.wishlist().to_owned(),
                    image_url: None,
                    is_read: false,
                    created_at: Utc::now(),
                })
            });

        let (status, body) = post(
            state_with(submission),
            json!({ "name": "Tom", "wishlist": "a kite", "behavior": "naughty" }),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body, json!({ "state": "sent", "name": "Tom" }));
    }

    #[actix_web::test]
    async fn contact_details_are_trimmed_and_blank_ones_dropped() {
        let mut submission = MockLetterSubmission::new();
        submission
            .expect_submit()
            .withf(|letter, _| {
                let stored = letter.clone().into_new_letter(None);
                stored.email().is_none() && stored.phone() == Some("555-0100")
            })
            .times(1)
            .returning(|letter, _| {
                let stored = letter.into_new_letter(None);
                Ok(Letter {
                    id: LetterId::from_uuid(Uuid::new_v4()),
                    name: stored.name().to_owned(),
                    age: stored.age(),
                    email: None,
                    phone: stored.phone().map(str::to_owned),
                    behavior: stored.behavior(),
                    wishlist: stored.wishlist().to_owned(),
                    image_url: None,
                    is_read: false,
                    created_at: Utc::now(),
                })
            });

        let (status, _) = post(
            state_with(submission),
            json!({
                "name": "Amy",
                "wishlist": "a sled",
                "email": "   ",
                "phone": " 555-0100 ",
            }),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
    }

    #[rstest]
    #[case::no_name(json!({ "wishlist": "a kite" }), "name")]
    #[case::no_wishlist(json!({ "name": "Tom", "wishlist": "  " }), "wishlist")]
    #[case::bad_behaviour(json!({ "name": "Tom", "wishlist": "a kite", "behavior": "grumpy" }), "behavior")]
    #[case::bad_photo(json!({ "name": "Tom", "wishlist": "a kite", "photo": "%%%" }), "photo")]
    #[actix_web::test]
    async fn rejects_invalid_input_without_submitting(#[case] body: Value, #[case] field: &str) {
        let mut submission = MockLetterSubmission::new();
        submission.expect_submit().never();

        let (status, body) = post(state_with(submission), body).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "invalid_request");
        assert_eq!(body["details"]["field"], field);
    }

    #[actix_web::test]
    async fn backend_failure_is_service_unavailable() {
        let mut submission = MockLetterSubmission::new();
        submission
            .expect_submit()
            .times(1)
            .returning(|_, _| Err(Error::service_unavailable(SUBMISSION_FAILED_MESSAGE)));

        let (status, body) = post(
            state_with(submission),
            json!({ "name": "Tom", "wishlist": "a kite" }),
        )
        .await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["message"], SUBMISSION_FAILED_MESSAGE);
    }

    #[rstest]
    #[case("aGVsbG8=")]
    #[case("data:image/png;base64,aGVsbG8=")]
    fn photo_accepts_plain_and_data_url_base64(#[case] raw: &str) {
        assert_eq!(decode_photo(raw).expect("decodes"), Some(b"hello".to_vec()));
    }

    #[test]
    fn empty_photo_means_no_photo() {
        assert_eq!(decode_photo("  ").expect("decodes"), None);
        assert_eq!(decode_photo("data:image/png;base64,").expect("decodes"), None);
    }
}
