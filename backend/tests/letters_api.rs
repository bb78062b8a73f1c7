//! Public letter endpoints: send a letter, then look up its ticket.

#[path = "support/http.rs"]
mod http_support;

use std::io::Cursor;
use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::test::{self, TestRequest};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use http_support::{init_app, send};
use image::{DynamicImage, ImageFormat, RgbImage};
use mailroom::domain::{
    DELIVERY_LINE, MISSING_INFORMATION_MESSAGE, TICKET_NOT_FOUND_TITLE, TRACE_ID_HEADER,
};
use mailroom::inbound::http::test_utils::test_state_over;
use mailroom::test_support::{InMemoryLetterStore, StoreCall, StoreFailures};
use rstest::{fixture, rstest};
use serde_json::{Value, json};

#[fixture]
fn store() -> Arc<InMemoryLetterStore> {
    Arc::new(InMemoryLetterStore::new())
}

fn submit(body: &Value) -> actix_http::Request {
    TestRequest::post()
        .uri("/api/v1/letters")
        .set_json(body)
        .to_request()
}

fn png_data_url(width: u32, height: u32) -> String {
    let mut bytes = Vec::new();
    DynamicImage::ImageRgb8(RgbImage::new(width, height))
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .expect("encode png");
    format!("data:image/png;base64,{}", STANDARD.encode(bytes))
}

#[rstest]
#[actix_web::test]
async fn sent_letter_can_be_found_by_phone(store: Arc<InMemoryLetterStore>) {
    let app = init_app(test_state_over(store.clone())).await;

    let (status, body) = send(
        &app,
        submit(&json!({
            "name": "  Tom ",
            "age": 7,
            "phone": "555-0100",
            "behavior": "naughty",
            "wishlist": "A red kite"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body, json!({ "state": "sent", "name": "Tom" }));

    let rows = store.rows();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].name, "Tom");
    assert_eq!(rows[0].image_url, None);

    let (status, ticket) = send(
        &app,
        TestRequest::get()
            .uri("/api/v1/tickets?phone=%20555-0100%20")
            .to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ticket["ticketNumber"], rows[0].id.ticket_number());
    assert_eq!(ticket["name"], "Tom");
    assert_eq!(ticket["verdict"], "NAUGHTY (but forgiven)");
    assert_eq!(ticket["delivery"], DELIVERY_LINE);
}

#[rstest]
#[actix_web::test]
async fn photo_is_bounded_and_stored_before_the_letter(store: Arc<InMemoryLetterStore>) {
    let app = init_app(test_state_over(store.clone())).await;

    let (status, _) = send(
        &app,
        submit(&json!({
            "name": "Ada",
            "wishlist": "a telescope",
            "photo": png_data_url(1200, 300)
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let names = store.blob_names();
    assert_eq!(names.len(), 1);
    let blob = store.blob(&names[0]).expect("blob stored");
    let stored = image::load_from_memory(&blob).expect("stored blob is an image");
    assert_eq!((stored.width(), stored.height()), (600, 150));

    let calls = store.calls();
    assert!(matches!(calls.as_slice(), [StoreCall::Upload(_), StoreCall::Insert]));
    let image_url = store.rows()[0].image_url.clone().expect("letter links its photo");
    assert!(image_url.as_str().ends_with(names[0].as_str()));
}

#[rstest]
#[case::blank_name(json!({ "name": "   ", "wishlist": "a kite" }), "name")]
#[case::blank_wishlist(json!({ "name": "Tom", "wishlist": "" }), "wishlist")]
#[actix_web::test]
async fn incomplete_letters_are_refused_without_a_write(
    store: Arc<InMemoryLetterStore>,
    #[case] body: Value,
    #[case] field: &str,
) {
    let app = init_app(test_state_over(store.clone())).await;

    let (status, error) = send(&app, submit(&body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["code"], "invalid_request");
    assert_eq!(error["message"], MISSING_INFORMATION_MESSAGE);
    assert_eq!(error["details"]["field"], field);
    assert!(store.calls().is_empty());
}

#[rstest]
#[actix_web::test]
async fn unknown_behaviour_is_refused(store: Arc<InMemoryLetterStore>) {
    let app = init_app(test_state_over(store.clone())).await;

    let (status, error) = send(
        &app,
        submit(&json!({ "name": "Tom", "wishlist": "a kite", "behavior": "grumpy" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["details"]["field"], "behavior");
    assert!(store.rows().is_empty());
}

#[rstest]
#[actix_web::test]
async fn backend_failure_is_service_unavailable(store: Arc<InMemoryLetterStore>) {
    store.set_failures(StoreFailures {
        insert: true,
        ..StoreFailures::default()
    });
    let app = init_app(test_state_over(store.clone())).await;

    let response = test::call_service(
        &app,
        submit(&json!({ "name": "Tom", "wishlist": "a kite" })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let header_trace = response
        .headers()
        .get(TRACE_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned)
        .expect("trace id header");
    let error: Value = test::read_body_json(response).await;
    assert_eq!(error["code"], "service_unavailable");
    assert_eq!(error["traceId"], header_trace.as_str());
    assert!(store.rows().is_empty());
}

#[rstest]
#[case::missing("/api/v1/tickets", StatusCode::BAD_REQUEST)]
#[case::blank("/api/v1/tickets?phone=%20%20", StatusCode::BAD_REQUEST)]
#[case::unknown("/api/v1/tickets?phone=555-9999", StatusCode::NOT_FOUND)]
#[actix_web::test]
async fn ticket_lookup_failures(
    store: Arc<InMemoryLetterStore>,
    #[case] uri: &str,
    #[case] expected: StatusCode,
) {
    let app = init_app(test_state_over(store)).await;

    let (status, error) = send(&app, TestRequest::get().uri(uri).to_request()).await;

    assert_eq!(status, expected);
    if expected == StatusCode::NOT_FOUND {
        assert_eq!(error["details"]["title"], TICKET_NOT_FOUND_TITLE);
    }
}
