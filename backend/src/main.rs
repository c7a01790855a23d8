//! Backend entry-point: loads configuration, prepares storage, seeds the
//! catalogue and serves the REST API.

mod server;

use std::ffi::OsString;
use std::io;

use actix_web::web;
use mockable::DefaultEnv;
use ortho_config::OrthoConfig;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

use server::{ServerConfig, ServerSettings, build_storage, create_server};
use storefront::catalogue_seeding::{CatalogueSeedSettings, seed_catalogue_on_startup};
use storefront::inbound::http::health::HealthState;
use storefront::inbound::http::session_config::{BuildMode, SessionToggles, session_settings};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = ServerSettings::load_from_iter([OsString::from("storefront")])
        .map_err(|error| io::Error::other(format!("load server settings: {error}")))?;
    let toggles = SessionToggles::from_env(&DefaultEnv::new());
    let session = session_settings(&toggles, BuildMode::from_debug_assertions())
        .map_err(|error| io::Error::other(error.to_string()))?;

    let storage = build_storage(&settings).await?;

    let seed = CatalogueSeedSettings::load_from_iter([OsString::from("storefront")])
        .map_err(|error| io::Error::other(format!("load catalogue seed settings: {error}")))?;
    seed_catalogue_on_startup(&seed, storage.as_ref())
        .await
        .map_err(|error| io::Error::other(format!("seed catalogue: {error}")))?;

    let config = ServerConfig::new(session, settings.bind_addr(), storage);
    let health_state = web::Data::new(HealthState::new());
    create_server(health_state, config)?.await
}
