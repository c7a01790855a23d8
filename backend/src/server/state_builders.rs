//! Builders for the storage adapter and HTTP handler state.

use std::io;
use std::sync::Arc;

use actix_web::web;
use tracing::{info, warn};

use storefront::domain::ports::Storage;
use storefront::inbound::http::state::HttpState;
use storefront::outbound::InMemoryStorage;
use storefront::outbound::persistence::{DbPool, DieselStorage, PoolConfig, run_migrations};

use super::ServerConfig;
use super::settings::ServerSettings;

/// Build the storage adapter named by the settings.
///
/// A database URL selects PostgreSQL, applying pending migrations first;
/// otherwise the catalogue and carts live in memory and vanish on restart.
///
/// # Errors
/// Returns [`io::Error`] when migrations fail or the pool cannot be built.
pub async fn build_storage(settings: &ServerSettings) -> io::Result<Arc<dyn Storage>> {
    let Some(database_url) = settings.database_url() else {
        warn!("STOREFRONT_DATABASE_URL not set; using in-memory storage");
        return Ok(Arc::new(InMemoryStorage::new()));
    };

    run_migrations(database_url)
        .await
        .map_err(|error| io::Error::other(format!("apply migrations: {error}")))?;
    let pool = DbPool::new(PoolConfig::new(database_url).with_max_size(settings.db_pool_size()))
        .await
        .map_err(|error| io::Error::other(format!("create database pool: {error}")))?;
    info!(pool_size = settings.db_pool_size(), "using PostgreSQL storage");
    Ok(Arc::new(DieselStorage::new(pool)))
}

/// Wire the domain services for the handlers.
pub fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    web::Data::new(HttpState::from_storage(
        config.storage.clone(),
        config.identity.clone(),
    ))
}
