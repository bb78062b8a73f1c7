//! Fallback surface served when required backend settings are absent.
//!
//! The process keeps listening so operators see a clear answer instead of a
//! crash loop, but no letter route is wired: every request other than the
//! health probes receives `503 service_unavailable` naming the missing
//! variables.

use actix_web::{HttpRequest, HttpResponse, web};
use serde_json::json;
use tracing::warn;

use crate::domain::Error;
use crate::inbound::http::ApiResult;

/// Title shown instead of any page while misconfigured.
pub const CONFIGURATION_ERROR_MESSAGE: &str = "Configuration Error";

/// Names of the configuration variables that were absent or unusable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigurationFault {
    missing: Vec<&'static str>,
}

impl ConfigurationFault {
    pub fn new(missing: Vec<&'static str>) -> Self {
        Self { missing }
    }

    pub fn missing(&self) -> &[&'static str] {
        &self.missing
    }

    /// The error every request receives.
    pub fn to_error(&self) -> Error {
        Error::service_unavailable(CONFIGURATION_ERROR_MESSAGE)
            .with_details(json!({ "missing": self.missing }))
    }
}

/// Default service answering every unmatched route.
pub async fn configuration_error(
    fault: web::Data<ConfigurationFault>,
    req: HttpRequest,
) -> ApiResult<HttpResponse> {
    warn!(path = %req.path(), missing = ?fault.missing(), "request refused: configuration error");
    Err(fault.to_error())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Trace;
    use crate::inbound::http::health::{HealthState, live, ready};
    use actix_web::http::StatusCode;
    use actix_web::{App, test as actix_test};
    use serde_json::Value;

    #[actix_web::test]
    async fn every_route_reports_the_missing_variables() {
        let fault = ConfigurationFault::new(vec!["MAILROOM_BACKEND_URL", "MAILROOM_BACKEND_KEY"]);
        let app = actix_test::init_service(
            App::new()
                .app_data(web::Data::new(fault))
                .app_data(web::Data::new(HealthState::new()))
                .wrap(Trace)
                .service(ready)
                .service(live)
                .default_service(web::to(configuration_error)),
        )
        .await;

        for uri in ["/api/v1/letters", "/api/v1/admin/letters", "/"] {
            let response = actix_test::call_service(
                &app,
                actix_test::TestRequest::get().uri(uri).to_request(),
            )
            .await;
            assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE, "{uri}");
            let body: Value = actix_test::read_body_json(response).await;
            assert_eq!(body["code"], "service_unavailable");
            assert_eq!(body["message"], CONFIGURATION_ERROR_MESSAGE);
            assert_eq!(
                body["details"]["missing"],
                serde_json::json!(["MAILROOM_BACKEND_URL", "MAILROOM_BACKEND_KEY"])
            );
            assert!(body["traceId"].is_string());
        }

        let ready_response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get().uri("/health/ready").to_request(),
        )
        .await;
        assert_eq!(ready_response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let live_response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get().uri("/health/live").to_request(),
        )
        .await;
        assert_eq!(live_response.status(), StatusCode::OK);
    }
}
