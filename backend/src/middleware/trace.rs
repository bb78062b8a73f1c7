//! Request correlation for Mailroom.
//!
//! Every request runs inside a [`TraceId`] scope and a `request` span. The id
//! is echoed in the `trace-id` response header and copied into error bodies,
//! so a helper can quote it when a letter fails to send. A caller may supply
//! its own id in the same header (the admin page does, to tie a WebSocket
//! refresh to the click that caused it); anything that is not a UUID is
//! replaced.

use std::task::{Context, Poll};
use std::time::Instant;

use actix_web::Error;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::StatusCode;
use actix_web::http::header::{HeaderName, HeaderValue};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use tracing::{Instrument, debug, info, info_span, warn};

use crate::domain::{TRACE_ID_HEADER, TraceId};

/// Middleware factory. Wrap it outermost so every other layer sees the id.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use mailroom::Trace;
///
/// let app = App::new().wrap(Trace);
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct Trace;

impl<S, B> Transform<S, ServiceRequest> for Trace
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = TraceMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(TraceMiddleware { service }))
    }
}

/// Service produced by [`Trace`].
pub struct TraceMiddleware<S> {
    service: S,
}

/// Reuse a well-formed caller id, otherwise mint a fresh one.
fn incoming_or_new(req: &ServiceRequest) -> TraceId {
    let supplied = req
        .headers()
        .get(TRACE_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim);
    match supplied.map(str::parse::<TraceId>) {
        Some(Ok(id)) => id,
        Some(Err(_)) => {
            debug!("ignoring malformed inbound trace id");
            TraceId::generate()
        }
        None => TraceId::generate(),
    }
}

fn log_completion(status: StatusCode, started: Instant) {
    let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
    if status.is_server_error() {
        warn!(status = status.as_u16(), elapsed_ms, "request failed");
    } else {
        info!(status = status.as_u16(), elapsed_ms, "request completed");
    }
}

impl<S, B> Service<ServiceRequest> for TraceMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let trace_id = incoming_or_new(&req);
        let span = info_span!(
            "request",
            trace_id = %trace_id,
            method = %req.method(),
            path = req.path(),
        );
        let started = Instant::now();
        let fut = span.in_scope(|| self.service.call(req));
        let scoped = TraceId::scope(trace_id, async move {
            let mut res = fut.await?;
            if let Ok(value) = HeaderValue::from_str(&trace_id.to_string()) {
                res.response_mut()
                    .headers_mut()
                    .insert(HeaderName::from_static(TRACE_ID_HEADER), value);
            }
            log_completion(res.status(), started);
            Ok(res)
        });
        Box::pin(scoped.instrument(span))
    }
}
