//! Driving port for cart mutations.

use async_trait::async_trait;

use crate::domain::{CartItem, CartItemId, Error, ProductId, Quantity, UserId};

/// Add `quantity` units of a product to the caller's cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddCartItemRequest {
    pub user_id: UserId,
    pub product_id: ProductId,
    pub quantity: Quantity,
}

/// Replace the quantity of one of the caller's cart items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateCartItemRequest {
    pub user_id: UserId,
    pub item_id: CartItemId,
    pub quantity: Quantity,
}

/// Remove one of the caller's cart items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoveCartItemRequest {
    pub user_id: UserId,
    pub item_id: CartItemId,
}

/// Cart mutations invoked by inbound adapters.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CartCommand: Send + Sync {
    /// Merge units into the cart after checking existence and stock.
    async fn add_item(&self, request: AddCartItemRequest) -> Result<CartItem, Error>;

    /// Set an owned item's quantity; other users' items read as missing.
    async fn update_quantity(&self, request: UpdateCartItemRequest) -> Result<CartItem, Error>;

    /// Remove an owned item; missing or foreign items are a no-op.
    async fn remove_item(&self, request: RemoveCartItemRequest) -> Result<(), Error>;
}
