//! OpenAPI schema definitions for domain types.
//!
//! Domain types stay free of utoipa derives; these wrappers describe their
//! JSON shape and register under the domain type's path.

use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    /// The request is malformed or fails validation.
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    /// The requested quantity exceeds the product's stock.
    #[schema(rename = "insufficient_stock")]
    InsufficientStock,
    /// No valid session.
    #[schema(rename = "unauthorized")]
    Unauthorized,
    /// The requested resource does not exist.
    #[schema(rename = "not_found")]
    NotFound,
    /// A dependency such as the database is unavailable.
    #[schema(rename = "service_unavailable")]
    ServiceUnavailable,
    /// An unexpected error occurred on the server.
    #[schema(rename = "internal_error")]
    InternalError,
}

/// OpenAPI schema for [`crate::domain::Error`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Error, rename_all = "camelCase")]
#[expect(dead_code, reason = "Used only for OpenAPI schema generation via utoipa")]
pub struct ErrorSchema {
    #[schema(example = "not_found")]
    code: ErrorCodeSchema,
    #[schema(example = "Product not found")]
    message: String,
    /// Correlation identifier echoed in the `trace-id` header.
    #[schema(example = "8a4f6f0e-2c1b-4a58-9c0c-1d2e3f405162")]
    trace_id: Option<String>,
    details: Option<serde_json::Value>,
}

/// OpenAPI schema for [`crate::domain::User`].
#[derive(ToSchema)]
#[schema(as = crate::domain::User, rename_all = "camelCase")]
#[expect(dead_code, reason = "Used only for OpenAPI schema generation via utoipa")]
pub struct UserSchema {
    /// Opaque subject issued by the identity provider.
    #[schema(example = "dev-rider")]
    id: String,
    #[schema(example = "rider@example.com")]
    email: Option<String>,
    first_name: Option<String>,
    last_name: Option<String>,
    profile_image_url: Option<String>,
    #[schema(value_type = String, format = DateTime)]
    created_at: String,
    #[schema(value_type = String, format = DateTime)]
    updated_at: String,
}

/// OpenAPI schema for [`crate::domain::Product`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Product, rename_all = "camelCase")]
#[expect(dead_code, reason = "Used only for OpenAPI schema generation via utoipa")]
pub struct ProductSchema {
    #[schema(value_type = String, format = Uuid)]
    id: String,
    #[schema(example = "MT-09 Filtro Olio Originale")]
    name: String,
    #[schema(example = "5GH-13440-70")]
    part_number: String,
    description: String,
    #[schema(example = "engine")]
    category: String,
    /// Decimal price with two fractional digits, encoded as a string.
    #[schema(example = "18.50")]
    price: String,
    #[schema(minimum = 0, example = 45)]
    stock: u32,
    image_url: Option<String>,
    compatible_models: Vec<String>,
    #[schema(value_type = String, format = DateTime)]
    created_at: String,
}

/// OpenAPI schema for [`crate::domain::CartItem`].
#[derive(ToSchema)]
#[schema(as = crate::domain::CartItem, rename_all = "camelCase")]
#[expect(dead_code, reason = "Used only for OpenAPI schema generation via utoipa")]
pub struct CartItemSchema {
    #[schema(value_type = String, format = Uuid)]
    id: String,
    user_id: String,
    #[schema(value_type = String, format = Uuid)]
    product_id: String,
    #[schema(minimum = 1, example = 2)]
    quantity: u32,
    #[schema(value_type = String, format = DateTime)]
    created_at: String,
    #[schema(value_type = String, format = DateTime)]
    updated_at: String,
}

/// OpenAPI schema for [`crate::domain::CartItemWithProduct`].
///
/// The cart item's fields are flattened alongside the nested product.
#[derive(ToSchema)]
#[schema(as = crate::domain::CartItemWithProduct, rename_all = "camelCase")]
#[expect(dead_code, reason = "Used only for OpenAPI schema generation via utoipa")]
pub struct CartItemWithProductSchema {
    #[schema(value_type = String, format = Uuid)]
    id: String,
    user_id: String,
    #[schema(value_type = String, format = Uuid)]
    product_id: String,
    quantity: u32,
    #[schema(value_type = String, format = DateTime)]
    created_at: String,
    #[schema(value_type = String, format = DateTime)]
    updated_at: String,
    product: ProductSchema,
}
