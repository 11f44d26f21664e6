//! Backend entry-point: loads settings, migrates the database and serves the
//! REST API with health probes and, in debug builds, Swagger UI.

mod server;

use actix_web::web;
use mockable::DefaultEnv;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use carelink::inbound::http::health::HealthState;
use carelink::inbound::http::session_config::{BuildMode, session_settings_from_env};
use carelink::outbound::persistence::{DbPool, run_pending_migrations};
use server::{AppSettings, ServerConfig, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load().map_err(|err| std::io::Error::other(err.to_string()))?;
    let session = session_settings_from_env(&DefaultEnv::new(), BuildMode::current())
        .map_err(std::io::Error::other)?;
    info!(fingerprint = %session.fingerprint(), "session key loaded");

    let database_url = settings.database_url.clone();
    tokio::task::spawn_blocking(move || run_pending_migrations(&database_url))
        .await
        .map_err(std::io::Error::other)?
        .map_err(std::io::Error::other)?;

    let pool = DbPool::new(settings.pool_config())
        .await
        .map_err(std::io::Error::other)?;
    let bind_addr = settings.bind_addr()?;
    let config = ServerConfig::new(session, &settings, bind_addr, pool);

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, config)?;
    info!(%bind_addr, "listening");
    server.await
}
