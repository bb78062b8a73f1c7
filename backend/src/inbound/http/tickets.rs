//! Ticket lookup endpoint.
//!
//! ```text
//! GET /api/v1/tickets?phone=555-0100
//! ```

use actix_web::{get, web};
use serde::Deserialize;
use serde_json::json;

use crate::domain::{Error, TICKET_NOT_FOUND_MESSAGE, TICKET_NOT_FOUND_TITLE, Ticket, TicketOutcome};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{ErrorSchema, TicketSchema};
use crate::inbound::http::state::HttpState;

/// Query for `GET /api/v1/tickets`.
#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct TicketQuery {
    /// Phone number given on the letter. Matched exactly after trimming.
    pub phone: Option<String>,
}

/// Find the shipping ticket for the latest letter sent from a phone number.
#[utoipa::path(
    get,
    path = "/api/v1/tickets",
    params(TicketQuery),
    responses(
        (status = 200, description = "Ticket found", body = TicketSchema),
        (status = 400, description = "Phone number missing", body = ErrorSchema),
        (status = 404, description = "No letter for this phone number", body = ErrorSchema)
    ),
    tags = ["tickets"],
    operation_id = "findTicket",
    security([])
)]
#[get("/tickets")]
pub async fn find_ticket(
    state: web::Data<HttpState>,
    query: web::Query<TicketQuery>,
) -> ApiResult<web::Json<Ticket>> {
    let phone = query.phone.as_deref().unwrap_or_default();
    match state.tickets.find_ticket(phone).await? {
        TicketOutcome::Found(ticket) => Ok(web::Json(ticket)),
        TicketOutcome::NotFound => Err(Error::not_found(TICKET_NOT_FOUND_MESSAGE)
            .with_details(json!({ "title": TICKET_NOT_FOUND_TITLE }))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::MockTicketLookup;
    use crate::domain::{Behavior, DELIVERY_LINE};
    use crate::inbound::http::state::HttpStatePorts;
    use crate::inbound::http::test_utils::test_state;
    use actix_web::http::StatusCode;
    use actix_web::{App, test as actix_test};
    use serde_json::Value;
    use std::sync::Arc;

    fn state_with(tickets: MockTicketLookup) -> HttpState {
        let HttpState {
            login,
            submission,
            admin,
            ..
        } = test_state();
        HttpState::new(HttpStatePorts {
            login,
            submission,
            admin,
            tickets: Arc::new(tickets),
        })
    }

    async fn get(state: HttpState, uri: &str) -> (StatusCode, Value) {
        let app = actix_test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .service(web::scope("/api/v1").service(find_ticket)),
        )
        .await;
        let response =
            actix_test::call_service(&app, actix_test::TestRequest::get().uri(uri).to_request())
                .await;
        let status = response.status();
        let body = actix_test::read_body(response).await;
        (status, serde_json::from_slice(&body).unwrap_or(Value::Null))
    }

    #[actix_web::test]
    async fn returns_the_ticket() {
        let mut tickets = MockTicketLookup::new();
        tickets
            .expect_find_ticket()
            .withf(|phone| phone == "555-0100")
            .times(1)
            .returning(|_| {
                Ok(TicketOutcome::Found(Ticket {
                    ticket_number: "3F2A9C1B".into(),
                    name: "Tom".into(),
                    behavior: Behavior::Nice,
                    verdict: "NICE ✓".into(),
                    letter_date: "December 1, 2025".into(),
                    delivery: DELIVERY_LINE.into(),
                }))
            });

        let (status, body) = get(state_with(tickets), "/api/v1/tickets?phone=555-0100").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["ticketNumber"], "3F2A9C1B");
        assert_eq!(body["verdict"], "NICE ✓");
        assert_eq!(body["letterDate"], "December 1, 2025");
    }

    #[actix_web::test]
    async fn miss_is_not_found() {
        let mut tickets = MockTicketLookup::new();
        tickets
            .expect_find_ticket()
            .returning(|_| Ok(TicketOutcome::NotFound));

        let (status, body) = get(state_with(tickets), "/api/v1/tickets?phone=555-0000").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], TICKET_NOT_FOUND_MESSAGE);
        assert_eq!(body["details"]["title"], TICKET_NOT_FOUND_TITLE);
    }

    #[actix_web::test]
    async fn missing_phone_is_passed_through_as_blank() {
        let mut tickets = MockTicketLookup::new();
        tickets
            .expect_find_ticket()
            .withf(|phone| phone.is_empty())
            .returning(|_| Err(Error::invalid_request("Enter phone number")));

        let (status, body) = get(state_with(tickets), "/api/v1/tickets").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Enter phone number");
    }
}
