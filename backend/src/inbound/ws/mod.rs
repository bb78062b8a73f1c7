//! Admin live board over WebSocket.
//!
//! The upgrade is checked here; the `session` module then streams letter snapshots
//! for the lifetime of the socket.

use actix_web::web::{self, Payload};
use actix_web::{HttpRequest, HttpResponse, get, http::header::ORIGIN};
use tracing::{error, warn};
use url::Url;

use crate::domain::{Error, TraceId};
use crate::inbound::http::session::SessionContext;

mod session;

pub mod messages;
pub mod state;

use state::{OriginAllowList, WsState};

/// Upgrade to the admin live board at `/ws/admin`.
///
/// The Origin check runs before the session check, so a foreign page learns
/// nothing about whether its visitor is signed in.
#[get("/ws/admin")]
pub async fn ws_entry(
    state: web::Data<WsState>,
    admin_session: SessionContext,
    req: HttpRequest,
    stream: Payload,
) -> Result<HttpResponse, Error> {
    check_origin(&state.origins, &req)?;
    let admin_id = admin_session.require_admin()?;

    let (response, ws_session, frames) = actix_ws::handle(&req, stream).map_err(|err| {
        warn!(error = %err, "WebSocket handshake rejected");
        Error::invalid_request("WebSocket upgrade failed")
    })?;
    TraceId::spawn_local(session::handle_ws_session(
        admin_id,
        state.admin.clone(),
        ws_session,
        frames,
    ));
    Ok(response)
}

/// Exactly one `Origin` header, parseable as a URL and on the allow-list.
fn check_origin(allow_list: &OriginAllowList, req: &HttpRequest) -> Result<(), Error> {
    let mut headers = req.headers().get_all(ORIGIN);
    let (Some(header), None) = (headers.next(), headers.next()) else {
        let count = req.headers().get_all(ORIGIN).count();
        if count == 0 {
            warn!("WebSocket upgrade without Origin");
            return Err(Error::forbidden("Origin not allowed"));
        }
        error!(count, "WebSocket upgrade with several Origin headers");
        return Err(Error::invalid_request("Invalid Origin header"));
    };

    let origin = header
        .to_str()
        .ok()
        .and_then(|raw| Url::parse(raw).ok())
        .ok_or_else(|| {
            error!(origin = ?header, "unparseable Origin header");
            Error::invalid_request("Invalid Origin header")
        })?;

    if !allow_list.allows(&origin) {
        warn!(origin = %origin, "WebSocket upgrade from a foreign origin");
        return Err(Error::forbidden("Origin not allowed"));
    }
    Ok(())
}
