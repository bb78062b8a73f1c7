//! In-process app wiring shared by the HTTP integration tests.
//!
//! Integration tests compile as separate crates, so the route table and the
//! login dance live here instead of being repeated per file.

use actix_http::Request;
use actix_web::body::MessageBody;
use actix_web::cookie::Cookie;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::test::{self, TestRequest};
use actix_web::{App, web};
use mailroom::Trace;
use mailroom::inbound::http::admin::{
    delete_letter, list_letters, login, logout, set_read, toggle_read,
};
use mailroom::inbound::http::letters::submit_letter;
use mailroom::inbound::http::state::HttpState;
use mailroom::inbound::http::test_utils::test_session_middleware;
use mailroom::inbound::http::tickets::find_ticket;
use mailroom::inbound::http::{json_config, query_config};
use serde_json::{Value, json};

/// Every REST route under `/api/v1`.
pub fn api_scope() -> actix_web::Scope {
    web::scope("/api/v1")
        .service(submit_letter)
        .service(find_ticket)
        .service(login)
        .service(logout)
        .service(list_letters)
        .service(toggle_read)
        .service(set_read)
        .service(delete_letter)
}

/// Build the API the way the server does, minus health and docs.
pub async fn init_app(
    state: HttpState,
) -> impl Service<Request, Response = ServiceResponse<impl MessageBody>, Error = actix_web::Error> {
    test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .app_data(json_config())
            .app_data(query_config())
            .wrap(test_session_middleware())
            .wrap(Trace)
            .service(api_scope()),
    )
    .await
}

/// Status and JSON body of a response; empty bodies read as `null`.
pub async fn send<S, B>(app: &S, req: Request) -> (StatusCode, Value)
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let response = test::call_service(app, req).await;
    let status = response.status();
    let body = test::read_body(response).await;
    let value = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).expect("JSON body")
    };
    (status, value)
}

/// Log in as the fixture admin and return the session cookie.
pub async fn admin_cookie<S, B>(app: &S) -> Cookie<'static>
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let response = test::call_service(
        app,
        TestRequest::post()
            .uri("/api/v1/admin/login")
            .set_json(json!({ "username": "elf", "password": "hohoho" }))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK, "fixture login");
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(Cookie::into_owned)
        .expect("session cookie")
}
