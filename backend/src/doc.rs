//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every storefront endpoint, the schema wrappers from
//! [`crate::inbound::http::schemas`] and the session cookie security scheme.
//! Swagger UI serves it in debug builds; `cargo run --bin openapi-dump`
//! exports it for tooling.

use crate::inbound::http::cart::{AddToCartRequest, UpdateQuantityRequest};
use crate::inbound::http::schemas::{
    CartItemSchema, CartItemWithProductSchema, ErrorCodeSchema, ErrorSchema, ProductSchema,
    UserSchema,
};
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by GET /api/login.",
            ))),
        );
    }
}

/// OpenAPI document for the storefront REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Storefront API",
        description = "Motorcycle parts catalogue, session-gated carts and health probes."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::auth::login,
        crate::inbound::http::auth::logout,
        crate::inbound::http::auth::current_user,
        crate::inbound::http::products::list_products,
        crate::inbound::http::products::get_product,
        crate::inbound::http::cart::list_cart,
        crate::inbound::http::cart::add_to_cart,
        crate::inbound::http::cart::update_cart_item,
        crate::inbound::http::cart::remove_cart_item,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        UserSchema,
        ProductSchema,
        CartItemSchema,
        CartItemWithProductSchema,
        AddToCartRequest,
        UpdateQuantityRequest,
        ErrorSchema,
        ErrorCodeSchema
    )),
    tags(
        (name = "auth", description = "Sign-in, sign-out and the current user"),
        (name = "products", description = "Public catalogue"),
        (name = "cart", description = "The signed-in user's cart"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::openapi::{get_property, unwrap_object_schema};
    use utoipa::OpenApi;

    #[test]
    fn every_route_is_documented() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/login",
            "/api/logout",
            "/api/auth/user",
            "/api/products",
            "/api/products/{id}",
            "/api/cart",
            "/api/cart/{id}",
            "/health/ready",
            "/health/live",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing path {path}");
        }
    }

    #[test]
    fn product_schema_uses_camel_case_fields() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        // utoipa replaces :: with . in schema names
        let product = schemas.get("crate.domain.Product").expect("Product schema");

        let product = unwrap_object_schema(product, "Product");
        for field in ["partNumber", "compatibleModels", "price", "imageUrl"] {
            get_property(product, field);
        }
    }

    #[test]
    fn error_schema_has_code_and_message() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let error = schemas.get("crate.domain.Error").expect("Error schema");

        let error = unwrap_object_schema(error, "Error");
        get_property(error, "code");
        get_property(error, "message");
    }

    #[test]
    fn session_cookie_scheme_is_registered() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("SessionCookie"));
    }
}
