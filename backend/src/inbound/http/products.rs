//! Catalogue handlers.
//!
//! ```text
//! GET /api/products?category=brakes
//! GET /api/products/{id}
//! ```

use actix_web::{get, web};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::domain::cart_service::PRODUCT_NOT_FOUND;
use crate::domain::{Error, Product, ProductId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{ErrorSchema, ProductSchema};
use crate::inbound::http::state::HttpState;

/// Query string for the product listing.
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct ProductListQuery {
    /// Exact category tag; absent or empty lists everything.
    pub category: Option<String>,
}

impl ProductListQuery {
    fn category(&self) -> Option<&str> {
        self.category.as_deref().filter(|value| !value.is_empty())
    }
}

/// List products newest first.
#[utoipa::path(
    get,
    path = "/api/products",
    params(ProductListQuery),
    responses(
        (status = 200, description = "Products", body = [ProductSchema]),
        (status = 500, description = "Internal server error", body = ErrorSchema),
        (status = 503, description = "Storage unavailable", body = ErrorSchema)
    ),
    tags = ["products"],
    operation_id = "listProducts",
    security([])
)]
#[get("/products")]
pub async fn list_products(
    state: web::Data<HttpState>,
    query: web::Query<ProductListQuery>,
) -> ApiResult<web::Json<Vec<Product>>> {
    let products = state.catalogue.list_products(query.category()).await?;
    Ok(web::Json(products))
}

/// Fetch a single product.
#[utoipa::path(
    get,
    path = "/api/products/{id}",
    params(("id" = String, Path, description = "Product UUID")),
    responses(
        (status = 200, description = "Product", body = ProductSchema),
        (status = 404, description = "Product not found", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["products"],
    operation_id = "getProduct",
    security([])
)]
#[get("/products/{id}")]
pub async fn get_product(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<Product>> {
    // A malformed id cannot name a stored product.
    let id: ProductId = path
        .parse()
        .map_err(|_| Error::not_found(PRODUCT_NOT_FOUND))?;
    let product = state.catalogue.get_product(&id).await?;
    Ok(web::Json(product))
}
