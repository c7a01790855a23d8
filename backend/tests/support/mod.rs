//! Shared helper utilities for storefront integration tests.
//!
//! Integration tests compile as separate crates under `backend/tests/`; this
//! module is the common home for spawning a live server and for the database
//! skip policy.

use std::io;
use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::Key;
use actix_web::dev::ServerHandle;
use actix_web::{App, HttpServer, web};
use reqwest::Url;
use storefront::Trace;
use storefront::domain::ports::{FixtureIdentityProvider, Storage};
use storefront::inbound::http::configure_api;
use storefront::inbound::http::state::HttpState;

/// Environment variable naming the PostgreSQL database used by adapter suites.
pub const TEST_DATABASE_URL: &str = "STOREFRONT_TEST_DATABASE_URL";

/// A storefront listening on an ephemeral loopback port.
pub struct LiveStorefront {
    pub base: Url,
    handle: ServerHandle,
}

impl LiveStorefront {
    /// Stop accepting connections and wait for in-flight requests.
    pub async fn stop(self) {
        self.handle.stop(true).await;
    }
}

/// Serve the `/api` routes over `storage` on `127.0.0.1:0`.
///
/// Must run inside an actix system, for example under `#[actix_web::test]`.
pub fn spawn_storefront(storage: Arc<dyn Storage>) -> io::Result<LiveStorefront> {
    let state = web::Data::new(HttpState::from_storage(
        storage,
        Arc::new(FixtureIdentityProvider::default()),
    ));
    let key = Key::generate();

    let server = HttpServer::new(move || {
        let session = SessionMiddleware::builder(CookieSessionStore::default(), key.clone())
            .cookie_name("session".to_owned())
            .cookie_path("/".to_owned())
            .cookie_secure(false)
            .build();
        App::new()
            .app_data(state.clone())
            .wrap(Trace)
            .service(web::scope("/api").wrap(session).configure(configure_api))
    })
    .workers(1)
    .bind(("127.0.0.1", 0))?;

    let addr = server
        .addrs()
        .first()
        .copied()
        .ok_or_else(|| io::Error::other("server bound no address"))?;
    let server = server.run();
    let handle = server.handle();
    actix_web::rt::spawn(server);

    let base = Url::parse(&format!("http://{addr}/")).map_err(io::Error::other)?;
    Ok(LiveStorefront { base, handle })
}

/// The adapter-suite database URL, or `None` with a skip marker when unset.
pub fn test_database_url() -> Option<String> {
    match std::env::var(TEST_DATABASE_URL) {
        Ok(url) if !url.trim().is_empty() => Some(url),
        _ => {
            eprintln!("SKIP-TEST-DATABASE: {TEST_DATABASE_URL} is not set");
            None
        }
    }
}
