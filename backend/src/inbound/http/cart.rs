//! Cart handlers. Every route requires a session, checked before the body
//! is parsed.
//!
//! ```text
//! GET    /api/cart
//! POST   /api/cart       {"productId":"…","quantity":2}
//! PATCH  /api/cart/{id}  {"quantity":3}
//! DELETE /api/cart/{id}
//! ```

use actix_web::{HttpResponse, delete, get, patch, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::cart_service::{CART_ITEM_NOT_FOUND, PRODUCT_NOT_FOUND};
use crate::domain::ports::{AddCartItemRequest, RemoveCartItemRequest, UpdateCartItemRequest};
use crate::domain::{CartItem, CartItemId, CartItemWithProduct, Error, ProductId, Quantity};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{CartItemSchema, CartItemWithProductSchema, ErrorSchema};
use crate::inbound::http::session::AuthenticatedUser;
use crate::inbound::http::state::HttpState;

pub(crate) const INVALID_REQUEST_DATA: &str = "Invalid request data";
pub(crate) const INVALID_QUANTITY: &str = "Invalid quantity";

/// Body of `POST /api/cart`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartRequest {
    #[schema(example = "6f1c1f0e-3d47-4a8f-9a55-3ab6fd2f7f10")]
    pub product_id: Option<String>,
    #[schema(minimum = 1, example = 1)]
    pub quantity: Option<i64>,
}

/// Body of `PATCH /api/cart/{id}`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateQuantityRequest {
    #[schema(minimum = 1, example = 3)]
    pub quantity: Option<i64>,
}

fn invalid_field(message: &str, field: &str) -> Error {
    Error::invalid_request(message).with_details(json!({ "field": field }))
}

fn parse_quantity(raw: Option<i64>, message: &str) -> Result<Quantity, Error> {
    raw.ok_or_else(|| invalid_field(message, "quantity"))
        .and_then(|value| Quantity::new(value).map_err(|_| invalid_field(message, "quantity")))
}

fn parse_add_request(payload: AddToCartRequest) -> Result<(ProductId, Quantity), Error> {
    let raw_product = payload
        .product_id
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| invalid_field(INVALID_REQUEST_DATA, "productId"))?;
    let quantity = parse_quantity(payload.quantity, INVALID_REQUEST_DATA)?;
    // A malformed id cannot name a stored product.
    let product_id = raw_product
        .parse()
        .map_err(|_| Error::not_found(PRODUCT_NOT_FOUND))?;
    Ok((product_id, quantity))
}

/// List the caller's cart, newest first.
#[utoipa::path(
    get,
    path = "/api/cart",
    responses(
        (status = 200, description = "Cart items joined with their products", body = [CartItemWithProductSchema]),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["cart"],
    operation_id = "listCart"
)]
#[get("/cart")]
pub async fn list_cart(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
) -> ApiResult<web::Json<Vec<CartItemWithProduct>>> {
    let user_id = user.into_inner();
    let items = state.cart_query.list_items(&user_id).await?;
    Ok(web::Json(items))
}

/// Add units of a product, merging with an existing line.
#[utoipa::path(
    post,
    path = "/api/cart",
    request_body = AddToCartRequest,
    responses(
        (status = 201, description = "Merged or created cart item", body = CartItemSchema),
        (status = 400, description = "Invalid request or insufficient stock", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Product not found", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["cart"],
    operation_id = "addToCart"
)]
#[post("/cart")]
pub async fn add_to_cart(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    payload: web::Json<AddToCartRequest>,
) -> ApiResult<HttpResponse> {
    let user_id = user.into_inner();
    let (product_id, quantity) = parse_add_request(payload.into_inner())?;
    let item: CartItem = state
        .cart
        .add_item(AddCartItemRequest {
            user_id,
            product_id,
            quantity,
        })
        .await?;
    Ok(HttpResponse::Created().json(item))
}

/// Replace the quantity of one of the caller's items. Stock is not checked.
#[utoipa::path(
    patch,
    path = "/api/cart/{id}",
    params(("id" = String, Path, description = "Cart item UUID")),
    request_body = UpdateQuantityRequest,
    responses(
        (status = 200, description = "Updated cart item", body = CartItemSchema),
        (status = 400, description = "Invalid quantity", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Cart item not found", body = ErrorSchema)
    ),
    tags = ["cart"],
    operation_id = "updateCartItem"
)]
#[patch("/cart/{id}")]
pub async fn update_cart_item(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<String>,
    payload: web::Json<UpdateQuantityRequest>,
) -> ApiResult<web::Json<CartItem>> {
    let user_id = user.into_inner();
    let quantity = parse_quantity(payload.quantity, INVALID_QUANTITY)?;
    let item_id: CartItemId = path
        .parse()
        .map_err(|_| Error::not_found(CART_ITEM_NOT_FOUND))?;
    let item = state
        .cart
        .update_quantity(UpdateCartItemRequest {
            user_id,
            item_id,
            quantity,
        })
        .await?;
    Ok(web::Json(item))
}

/// Remove one of the caller's items. Idempotent.
#[utoipa::path(
    delete,
    path = "/api/cart/{id}",
    params(("id" = String, Path, description = "Cart item UUID")),
    responses(
        (status = 204, description = "Removed, or nothing to remove"),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["cart"],
    operation_id = "removeCartItem"
)]
#[delete("/cart/{id}")]
pub async fn remove_cart_item(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let user_id = user.into_inner();
    if let Ok(item_id) = path.parse::<CartItemId>() {
        state
            .cart
            .remove_item(RemoveCartItemRequest { user_id, item_id })
            .await?;
    }
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
#[path = "cart_tests.rs"]
mod tests;
