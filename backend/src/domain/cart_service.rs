//! Cart use-cases.
//!
//! Validation happens here rather than in storage: the product must exist and
//! the requested quantity must not exceed its total stock. The check is not
//! cumulative with units already in the cart, and stock is never decremented.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::debug;

use crate::domain::ports::{
    AddCartItemRequest, CartCommand, CartQuery, RemoveCartItemRequest, Storage,
    UpdateCartItemRequest,
};
use crate::domain::{CartItem, CartItemId, CartItemWithProduct, Error, UserId};

pub(crate) const PRODUCT_NOT_FOUND: &str = "Product not found";
pub(crate) const CART_ITEM_NOT_FOUND: &str = "Cart item not found";
pub(crate) const INSUFFICIENT_STOCK: &str = "Insufficient stock";

/// Cart service implementing the cart driving ports over a storage adapter.
#[derive(Clone)]
pub struct CartService<S: ?Sized> {
    storage: Arc<S>,
}

impl<S: ?Sized> CartService<S> {
    /// Create a service backed by `storage`.
    pub const fn new(storage: Arc<S>) -> Self {
        Self { storage }
    }
}

impl<S> CartService<S>
where
    S: Storage + ?Sized,
{
    /// Load an item only when the caller owns it.
    async fn owned_item(
        &self,
        user_id: &UserId,
        item_id: &CartItemId,
    ) -> Result<Option<CartItem>, Error> {
        let item = self.storage.find_cart_item(item_id).await?;
        Ok(item.filter(|item| {
            let owned = item.is_owned_by(user_id);
            if !owned {
                debug!(item_id = %item_id, "cart item belongs to another user");
            }
            owned
        }))
    }
}

#[async_trait]
impl<S> CartCommand for CartService<S>
where
    S: Storage + ?Sized,
{
    async fn add_item(&self, request: AddCartItemRequest) -> Result<CartItem, Error> {
        let AddCartItemRequest {
            user_id,
            product_id,
            quantity,
        } = request;

        let product = self
            .storage
            .get_product_by_id(&product_id)
            .await?
            .ok_or_else(|| Error::not_found(PRODUCT_NOT_FOUND))?;

        if quantity.get() > product.stock {
            return Err(Error::insufficient_stock(INSUFFICIENT_STOCK).with_details(json!({
                "productId": product.id,
                "requested": quantity.get(),
                "available": product.stock,
            })));
        }

        Ok(self
            .storage
            .add_cart_item(&user_id, &product_id, quantity)
            .await?)
    }

    async fn update_quantity(&self, request: UpdateCartItemRequest) -> Result<CartItem, Error> {
        let UpdateCartItemRequest {
            user_id,
            item_id,
            quantity,
        } = request;

        if self.owned_item(&user_id, &item_id).await?.is_none() {
            return Err(Error::not_found(CART_ITEM_NOT_FOUND));
        }
        Ok(self
            .storage
            .update_cart_item_quantity(&item_id, quantity)
            .await?)
    }

    async fn remove_item(&self, request: RemoveCartItemRequest) -> Result<(), Error> {
        let RemoveCartItemRequest { user_id, item_id } = request;

        if self.owned_item(&user_id, &item_id).await?.is_some() {
            self.storage.delete_cart_item(&item_id).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl<S> CartQuery for CartService<S>
where
    S: Storage + ?Sized,
{
    async fn list_items(&self, user_id: &UserId) -> Result<Vec<CartItemWithProduct>, Error> {
        Ok(self.storage.list_cart_items_for_user(user_id).await?)
    }
}

#[cfg(test)]
#[path = "cart_service_tests.rs"]
mod tests;
