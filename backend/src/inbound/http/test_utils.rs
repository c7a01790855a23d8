//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::ServiceResponse;

use crate::domain::ports::FixtureIdentityProvider;
use crate::inbound::http::state::HttpState;
use crate::outbound::InMemoryStorage;

/// Session middleware with a fresh key, cookie name `session` and the
/// `Secure` flag off for plain-HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// Handler state over a fresh in-memory store, returned alongside the store
/// so tests can seed it directly.
pub fn memory_state() -> (HttpState, Arc<InMemoryStorage>) {
    let storage = Arc::new(InMemoryStorage::new());
    let state = HttpState::from_storage(
        storage.clone(),
        Arc::new(FixtureIdentityProvider::default()),
    );
    (state, storage)
}

/// The `session` cookie set by a response, if any.
pub fn session_cookie(res: &ServiceResponse) -> Option<Cookie<'static>> {
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(|cookie| cookie.into_owned())
}
