//! HTTP inbound adapter exposing the storefront REST API.

pub mod auth;
pub mod cart;
pub mod error;
pub mod health;
pub mod products;
pub mod schemas;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(test)]
pub mod test_utils;

use actix_web::web;
use tracing::debug;

use crate::domain::Error;

pub use error::ApiResult;

/// JSON extractor settings shared by every body-carrying route.
///
/// Malformed or mistyped bodies (for example a fractional quantity) become a
/// `400` with the standard error payload.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(16 * 1024)
        .error_handler(|err, _req| {
            debug!(error = %err, "rejected request body");
            Error::invalid_request(cart::INVALID_REQUEST_DATA).into()
        })
}

/// Register the `/api` routes. Mount inside a scope wrapped by the session
/// middleware.
///
/// # Examples
/// ```
/// use actix_web::{App, web};
/// use storefront::inbound::http::configure_api;
///
/// let app = App::new().service(web::scope("/api").configure(configure_api));
/// ```
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .service(auth::login)
        .service(auth::logout)
        .service(auth::current_user)
        .service(products::list_products)
        .service(products::get_product)
        .service(cart::list_cart)
        .service(cart::add_to_cart)
        .service(cart::update_cart_item)
        .service(cart::remove_cart_item);
}
