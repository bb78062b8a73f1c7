//! Server construction and middleware wiring.

mod config;
mod settings;
mod state_builders;

pub use config::ServerConfig;
pub use settings::ServerSettings;
pub use state_builders::{StartupError, Wiring, build_wiring};

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};

use mailroom::Trace;
#[cfg(debug_assertions)]
use mailroom::doc::ApiDoc;
use mailroom::inbound::http::admin::{
    delete_letter, list_letters, login, logout, set_read, toggle_read,
};
use mailroom::inbound::http::config_error::configuration_error;
use mailroom::inbound::http::health::{HealthState, live, ready};
use mailroom::inbound::http::letters::submit_letter;
use mailroom::inbound::http::tickets::find_ticket;
use mailroom::inbound::http::{json_config, query_config};
use mailroom::inbound::ws;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    wiring: Wiring,
    config: ServerConfig,
}

fn routes(cfg: &mut web::ServiceConfig, wiring: Wiring) {
    match wiring {
        Wiring::Ready { http, ws: ws_state } => {
            let api = web::scope("/api/v1")
                .service(submit_letter)
                .service(find_ticket)
                .service(login)
                .service(logout)
                .service(list_letters)
                .service(toggle_read)
                .service(set_read)
                .service(delete_letter);
            cfg.app_data(http)
                .app_data(ws_state)
                .service(api)
                .service(ws::ws_entry);
        }
        Wiring::Misconfigured(fault) => {
            cfg.app_data(fault)
                .default_service(web::to(configuration_error));
        }
    }
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        wiring,
        config,
    } = deps;

    let app = App::new()
        .app_data(health_state)
        .app_data(json_config())
        .app_data(query_config())
        .wrap(config.session_middleware())
        .wrap(Trace)
        .service(ready)
        .service(live)
        .configure(|cfg| routes(cfg, wiring));

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Construct the Actix HTTP server.
///
/// Readiness is only flagged when the full API is wired; in configuration
/// error mode the readiness probe keeps answering 503.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
    wiring: Wiring,
) -> std::io::Result<Server> {
    let ready_to_serve = matches!(wiring, Wiring::Ready { .. });
    let server_health_state = health_state.clone();
    let bind_addr = config.bind_addr();

    let server = HttpServer::new(move || {
        build_app(AppDependencies {
            health_state: server_health_state.clone(),
            wiring: wiring.clone(),
            config: config.clone(),
        })
    })
    .bind(bind_addr)?
    .run();

    if ready_to_serve {
        health_state.mark_ready();
    }
    Ok(server)
}
