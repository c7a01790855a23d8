//! Driven port for persistence of users, products and cart items.
//!
//! This is the sole gateway to stored data. Adapters must preserve the
//! ordering and join semantics documented on each method so the in-memory
//! and PostgreSQL implementations stay interchangeable.

use async_trait::async_trait;

use crate::domain::{
    CartItem, CartItemId, CartItemWithProduct, Error, NewProduct, Product, ProductId, Quantity,
    UpsertUser, User, UserId,
};

use super::define_port_error;

define_port_error! {
    /// Failures raised by storage adapters.
    pub enum StorageError {
        /// The backing store could not be reached.
        Connection { message: String } => "storage connection failed: {message}",
        /// A query or mutation failed during execution.
        Query { message: String } => "storage query failed: {message}",
        /// A uniqueness constraint rejected the write.
        Conflict { message: String } => "storage conflict: {message}",
        /// The addressed row does not exist.
        NotFound { message: String } => "storage record not found: {message}",
        /// A write would push a value past its column range.
        OutOfRange { message: String } => "storage value out of range: {message}",
    }
}

/// Typed access to the storefront tables.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Storage: Send + Sync {
    /// Fetch a user by id; `None` when absent.
    async fn get_user(&self, id: &UserId) -> Result<Option<User>, StorageError>;

    /// Insert a user, or overwrite its mutable fields and bump `updated_at`.
    async fn upsert_user(&self, user: &UpsertUser) -> Result<User, StorageError>;

    /// Remove a user and, by cascade, their cart items. Idempotent.
    async fn delete_user(&self, id: &UserId) -> Result<(), StorageError>;

    /// All products, newest first.
    async fn list_products(&self) -> Result<Vec<Product>, StorageError>;

    /// Products whose category equals `category`, newest first.
    async fn list_products_by_category(
        &self,
        category: &str,
    ) -> Result<Vec<Product>, StorageError>;

    /// Fetch a product by id; `None` when absent.
    async fn get_product_by_id(&self, id: &ProductId) -> Result<Option<Product>, StorageError>;

    /// Insert a product. A duplicate part number yields [`StorageError::Conflict`].
    async fn create_product(&self, product: &NewProduct) -> Result<Product, StorageError>;

    /// Remove a product and, by cascade, every cart item referencing it. Idempotent.
    async fn delete_product(&self, id: &ProductId) -> Result<(), StorageError>;

    /// The user's cart items joined with their products, newest first.
    ///
    /// Items whose product no longer exists are omitted.
    async fn list_cart_items_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<CartItemWithProduct>, StorageError>;

    /// The user's item for `product_id`, if any.
    async fn get_cart_item(
        &self,
        user_id: &UserId,
        product_id: &ProductId,
    ) -> Result<Option<CartItem>, StorageError>;

    /// Fetch a cart item by id regardless of owner.
    async fn find_cart_item(&self, id: &CartItemId) -> Result<Option<CartItem>, StorageError>;

    /// Merge-on-add: increment the existing `(user, product)` item by
    /// `quantity`, or insert a new one. Atomic with respect to concurrent adds.
    ///
    /// A merged total beyond [`Quantity::MAX`] yields [`StorageError::OutOfRange`].
    async fn add_cart_item(
        &self,
        user_id: &UserId,
        product_id: &ProductId,
        quantity: Quantity,
    ) -> Result<CartItem, StorageError>;

    /// Set an item's quantity and bump `updated_at`.
    ///
    /// A missing id yields [`StorageError::NotFound`].
    async fn update_cart_item_quantity(
        &self,
        id: &CartItemId,
        quantity: Quantity,
    ) -> Result<CartItem, StorageError>;

    /// Remove an item. Idempotent.
    async fn delete_cart_item(&self, id: &CartItemId) -> Result<(), StorageError>;

    /// Remove every item the user owns.
    async fn clear_cart(&self, user_id: &UserId) -> Result<(), StorageError>;
}

impl From<StorageError> for Error {
    fn from(error: StorageError) -> Self {
        match error {
            StorageError::Connection { message } => {
                Self::service_unavailable(format!("storage unavailable: {message}"))
            }
            StorageError::NotFound { message } => Self::not_found(message),
            StorageError::OutOfRange { message } => Self::invalid_request(message),
            StorageError::Query { message } | StorageError::Conflict { message } => {
                Self::internal(format!("storage error: {message}"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    #[rstest]
    #[case(StorageError::connection("refused"), ErrorCode::ServiceUnavailable)]
    #[case(StorageError::query("syntax"), ErrorCode::InternalError)]
    #[case(StorageError::conflict("part number"), ErrorCode::InternalError)]
    #[case(StorageError::not_found("cart item"), ErrorCode::NotFound)]
    #[case(StorageError::out_of_range("cart item quantity"), ErrorCode::InvalidRequest)]
    fn maps_to_domain_codes(#[case] error: StorageError, #[case] expected: ErrorCode) {
        assert_eq!(Error::from(error).code(), expected);
    }
}
