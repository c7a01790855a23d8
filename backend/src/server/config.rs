//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::sync::Arc;

use actix_web::cookie::{Key, SameSite};
use storefront::domain::ports::{FixtureIdentityProvider, IdentityProvider, Storage};
use storefront::inbound::http::session_config::SessionSettings;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) same_site: SameSite,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) storage: Arc<dyn Storage>,
    pub(crate) identity: Arc<dyn IdentityProvider>,
}

impl ServerConfig {
    /// Construct a server configuration over an already-built storage
    /// adapter. Sign-in uses the development identity provider.
    #[must_use]
    pub fn new(session: SessionSettings, bind_addr: SocketAddr, storage: Arc<dyn Storage>) -> Self {
        let SessionSettings {
            key,
            cookie_secure,
            same_site,
        } = session;
        Self {
            key,
            cookie_secure,
            same_site,
            bind_addr,
            storage,
            identity: Arc::new(FixtureIdentityProvider::default()),
        }
    }
}
