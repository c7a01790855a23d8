//! Driving port for reading carts.

use async_trait::async_trait;

use crate::domain::{CartItemWithProduct, Error, UserId};

/// Cart reads invoked by inbound adapters.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CartQuery: Send + Sync {
    /// The user's items joined with their products, newest first.
    async fn list_items(&self, user_id: &UserId) -> Result<Vec<CartItemWithProduct>, Error>;
}
