//! Liveness and readiness probes.
//!
//! The process moves through three phases: starting (alive, not ready),
//! serving (alive and ready) and draining (neither). Configuration error
//! mode never leaves the starting phase.

use std::sync::atomic::{AtomicU8, Ordering};

use actix_web::{HttpResponse, get, http::header, web};

const STARTING: u8 = 0;
const SERVING: u8 = 1;
const DRAINING: u8 = 2;

/// Process phase shared between the server and the probe handlers.
pub struct HealthState {
    phase: AtomicU8,
}

impl Default for HealthState {
    fn default() -> Self {
        Self {
            phase: AtomicU8::new(STARTING),
        }
    }
}

impl HealthState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starting → serving. Ignored once draining.
    pub fn mark_ready(&self) {
        let _ = self
            .phase
            .compare_exchange(STARTING, SERVING, Ordering::AcqRel, Ordering::Acquire);
    }

    /// Enter the draining phase; both probes fail from now on.
    pub fn mark_unhealthy(&self) {
        self.phase.store(DRAINING, Ordering::Release);
    }

    pub fn is_ready(&self) -> bool {
        self.phase.load(Ordering::Acquire) == SERVING
    }

    pub fn is_alive(&self) -> bool {
        self.phase.load(Ordering::Acquire) != DRAINING
    }
}

fn probe(passing: bool) -> HttpResponse {
    let mut builder = if passing {
        HttpResponse::Ok()
    } else {
        HttpResponse::ServiceUnavailable()
    };
    builder
        .insert_header((header::CACHE_CONTROL, "no-store"))
        .finish()
}

/// 200 once the letters API is wired, 503 otherwise.
#[utoipa::path(
    get,
    path = "/health/ready",
    tags = ["health"],
    security([]),
    responses(
        (status = 200, description = "Letters API is wired and serving"),
        (status = 503, description = "Starting, misconfigured or draining")
    )
)]
#[get("/health/ready")]
pub async fn ready(state: web::Data<HealthState>) -> HttpResponse {
    probe(state.is_ready())
}

/// 200 until shutdown begins.
#[utoipa::path(
    get,
    path = "/health/live",
    tags = ["health"],
    security([]),
    responses(
        (status = 200, description = "Process is up"),
        (status = 503, description = "Process is draining")
    )
)]
#[get("/health/live")]
pub async fn live(state: web::Data<HealthState>) -> HttpResponse {
    probe(state.is_alive())
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::{App, test as actix_test};
    use rstest::rstest;

    #[derive(Clone, Copy, Debug)]
    enum Phase {
        Starting,
        Serving,
        Draining,
    }

    fn state_in(phase: Phase) -> web::Data<HealthState> {
        let state = web::Data::new(HealthState::new());
        match phase {
            Phase::Starting => {}
            Phase::Serving => state.mark_ready(),
            Phase::Draining => {
                state.mark_ready();
                state.mark_unhealthy();
            }
        }
        state
    }

    #[rstest]
    #[case(Phase::Starting, "/health/ready", StatusCode::SERVICE_UNAVAILABLE)]
    #[case(Phase::Starting, "/health/live", StatusCode::OK)]
    #[case(Phase::Serving, "/health/ready", StatusCode::OK)]
    #[case(Phase::Serving, "/health/live", StatusCode::OK)]
    #[case(Phase::Draining, "/health/ready", StatusCode::SERVICE_UNAVAILABLE)]
    #[case(Phase::Draining, "/health/live", StatusCode::SERVICE_UNAVAILABLE)]
    #[actix_web::test]
    async fn probes_follow_the_phase(
        #[case] phase: Phase,
        #[case] uri: &str,
        #[case] expected: StatusCode,
    ) {
        let app = actix_test::init_service(
            App::new()
                .app_data(state_in(phase))
                .service(ready)
                .service(live),
        )
        .await;

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::get().uri(uri).to_request(),
        )
        .await;

        assert_eq!(res.status(), expected, "{uri} while {phase:?}");
        assert_eq!(
            res.headers().get(header::CACHE_CONTROL).map(|v| v.as_bytes()),
            Some(&b"no-store"[..])
        );
    }

    #[test]
    fn draining_is_final() {
        let state = HealthState::new();
        state.mark_unhealthy();
        state.mark_ready();
        assert!(!state.is_ready());
        assert!(!state.is_alive());
    }
}
