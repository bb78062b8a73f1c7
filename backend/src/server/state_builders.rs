//! Wiring of adapters and domain services from settings and secrets.

use std::sync::Arc;

use actix_web::web;
use mockable::{DefaultClock, Env};
use tracing::{error, info};
use url::Url;

use mailroom::domain::ports::TokioSleeper;
use mailroom::domain::{LetterAdminService, LetterSubmissionService, TicketLookupService};
use mailroom::inbound::http::config_error::ConfigurationFault;
use mailroom::inbound::http::state::{HttpState, HttpStatePorts};
use mailroom::inbound::ws::state::{OriginAllowList, WsState};
use mailroom::outbound::admin_login::{AdminDigestError, ConfiguredAdminLogin};
use mailroom::outbound::change_feed::BroadcastLetterChanges;
use mailroom::outbound::hosted::{HostedBackend, HostedBackendSettings, HostedClientError};

use super::settings::{ServerSettings, SettingsError};

/// Which surface the server exposes.
#[derive(Clone)]
pub enum Wiring {
    /// Backend configured: the full API.
    Ready {
        http: web::Data<HttpState>,
        ws: web::Data<WsState>,
    },
    /// Backend settings missing or invalid: every route answers 503.
    Misconfigured(web::Data<ConfigurationFault>),
}

/// Startup failures that stop the process.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error(transparent)]
    Client(#[from] HostedClientError),
    #[error(transparent)]
    AdminDigest(#[from] AdminDigestError),
}

/// Build the surface for the current environment.
///
/// Missing backend settings are not an error: they select the
/// configuration-error surface.
pub fn build_wiring<E: Env>(settings: &ServerSettings, env: &E) -> Result<Wiring, StartupError> {
    let backend_settings = match HostedBackendSettings::from_env(env) {
        Ok(backend_settings) => backend_settings,
        Err(err) => {
            error!(error = %err, "hosted backend not configured; serving configuration error");
            return Ok(Wiring::Misconfigured(web::Data::new(ConfigurationFault::new(
                err.variables(),
            ))));
        }
    };

    let backend = Arc::new(HostedBackend::new(&backend_settings, settings.resources())?);
    let login = Arc::new(ConfiguredAdminLogin::from_env(env, settings.admin_username())?);
    let origins = settings.allowed_origins()?;
    info!(
        backend = %backend_settings.url(),
        admin_login = login.is_enabled(),
        origins = origins.len(),
        "hosted backend wired"
    );
    Ok(wire_ports(backend, login, settings, origins))
}

fn wire_ports(
    backend: Arc<HostedBackend>,
    login: Arc<ConfiguredAdminLogin>,
    settings: &ServerSettings,
    origins: Vec<Url>,
) -> Wiring {
    let changes = Arc::new(BroadcastLetterChanges::new());
    let admin = Arc::new(LetterAdminService::new(backend.clone(), changes.clone()));
    let http = HttpState::new(HttpStatePorts {
        login,
        submission: Arc::new(LetterSubmissionService::new(
            backend.clone(),
            backend.clone(),
            changes,
            Arc::new(DefaultClock),
        )),
        admin: admin.clone(),
        tickets: Arc::new(TicketLookupService::new(backend)),
    })
    .with_sending_delay(settings.sending_delay(), Arc::new(TokioSleeper));
    let ws = WsState::new(
        admin,
        OriginAllowList::new(origins).with_localhost(settings.allow_localhost_origin),
    );

    Wiring::Ready {
        http: web::Data::new(http),
        ws: web::Data::new(ws),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mailroom::outbound::admin_login::ADMIN_PASSWORD_DIGEST_ENV;
    use mailroom::outbound::hosted::{BACKEND_KEY_ENV, BACKEND_URL_ENV};
    use mockable::MockEnv;
    use std::collections::HashMap;

    fn settings() -> ServerSettings {
        ServerSettings {
            bind_addr: None,
            table: None,
            bucket: None,
            sending_delay_ms: None,
            request_timeout_secs: None,
            admin_username: None,
            allowed_origins: Some(vec!["https://santa.example".to_owned()]),
            allow_localhost_origin: false,
        }
    }

    fn env_with(vars: &[(&str, &str)]) -> MockEnv {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        let mut env = MockEnv::new();
        env.expect_string()
            .returning(move |name| vars.get(name).cloned());
        env
    }

    #[test]
    fn missing_backend_selects_configuration_error() {
        let env = env_with(&[(BACKEND_KEY_ENV, "anon")]);
        match build_wiring(&settings(), &env) {
            Ok(Wiring::Misconfigured(fault)) => {
                assert_eq!(fault.missing(), &[BACKEND_URL_ENV]);
            }
            Ok(Wiring::Ready { .. }) => panic!("expected configuration error surface"),
            Err(err) => panic!("unexpected startup error: {err}"),
        }
    }

    #[test]
    fn complete_environment_wires_the_api() {
        let digest = "a".repeat(64);
        let env = env_with(&[
            (BACKEND_URL_ENV, "https://abc.example.co"),
            (BACKEND_KEY_ENV, "anon"),
            (ADMIN_PASSWORD_DIGEST_ENV, digest.as_str()),
        ]);
        assert!(matches!(
            build_wiring(&settings(), &env),
            Ok(Wiring::Ready { .. })
        ));
    }

    #[test]
    fn malformed_admin_digest_stops_startup() {
        let env = env_with(&[
            (BACKEND_URL_ENV, "https://abc.example.co"),
            (BACKEND_KEY_ENV, "anon"),
            (ADMIN_PASSWORD_DIGEST_ENV, "not-hex"),
        ]);
        assert!(matches!(
            build_wiring(&settings(), &env),
            Err(StartupError::AdminDigest(_))
        ));
    }
}
