//! Mailroom entry-point: loads settings, wires adapters and serves the API.

mod server;

use actix_web::web;
use color_eyre::eyre::{Result, eyre};
use mockable::DefaultEnv;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use mailroom::inbound::http::health::HealthState;
use mailroom::inbound::http::session_config::{BuildMode, session_settings_from_env};
use server::{ServerConfig, ServerSettings, build_wiring, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = ServerSettings::load().map_err(|err| eyre!("failed to load settings: {err}"))?;
    let env = DefaultEnv::new();
    let session = session_settings_from_env(&env, BuildMode::from_debug_assertions())?;
    let wiring = build_wiring(&settings, &env)?;
    let config = ServerConfig::new(session, settings.bind_addr()?);
    info!(addr = %config.bind_addr(), "mailroom listening");

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state.clone(), config, wiring)?;
    server.await?;
    health_state.mark_unhealthy();
    Ok(())
}
