//! In-process `Storage` adapter.
//!
//! Reproduces the PostgreSQL adapter's observable semantics (newest-first
//! ordering, inner-join cart listing, unique part numbers, cascading deletes
//! and the `(user, product)` merge) behind a single mutex. The server uses it
//! when no database is configured and the test suites use it everywhere.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockable::{Clock, DefaultClock};

use crate::domain::ports::{Storage, StorageError};
use crate::domain::{
    CartItem, CartItemId, CartItemWithProduct, NewProduct, Product, ProductId, Quantity,
    UpsertUser, User, UserId,
};

#[derive(Default)]
struct Tables {
    users: HashMap<UserId, User>,
    /// Insertion order; listing reverses it before the stable sort.
    products: Vec<Product>,
    cart_items: Vec<CartItem>,
}

impl Tables {
    fn product(&self, id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|product| &product.id == id)
    }
}

fn newest_first<T, F>(rows: impl DoubleEndedIterator<Item = T>, created_at: F) -> Vec<T>
where
    F: Fn(&T) -> DateTime<Utc>,
{
    let mut rows: Vec<T> = rows.rev().collect();
    rows.sort_by_key(|row| std::cmp::Reverse(created_at(row)));
    rows
}

/// Mutex-guarded in-memory storage.
#[derive(Clone)]
pub struct InMemoryStorage {
    tables: Arc<Mutex<Tables>>,
    clock: Arc<dyn Clock>,
}

impl Default for InMemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStorage {
    /// Empty storage stamped by the system clock.
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(Arc::new(DefaultClock))
    }

    /// Empty storage stamped by `clock`.
    #[must_use]
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            tables: Arc::new(Mutex::new(Tables::default())),
            clock,
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Tables>, StorageError> {
        self.tables
            .lock()
            .map_err(|_| StorageError::query("in-memory storage lock poisoned"))
    }

    fn now(&self) -> DateTime<Utc> {
        self.clock.utc()
    }
}

#[async_trait]
impl Storage for InMemoryStorage {
    async fn get_user(&self, id: &UserId) -> Result<Option<User>, StorageError> {
        Ok(self.lock()?.users.get(id).cloned())
    }

    async fn upsert_user(&self, user: &UpsertUser) -> Result<User, StorageError> {
        let now = self.now();
        let mut tables = self.lock()?;
        if let Some(email) = &user.email {
            let taken = tables
                .users
                .values()
                .any(|other| other.id != user.id && other.email.as_ref() == Some(email));
            if taken {
                return Err(StorageError::conflict("email already registered"));
            }
        }

        let created_at = tables
            .users
            .get(&user.id)
            .map_or(now, |existing| existing.created_at);
        let stored = User {
            id: user.id.clone(),
            email: user.email.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            profile_image_url: user.profile_image_url.clone(),
            created_at,
            updated_at: now,
        };
        tables.users.insert(user.id.clone(), stored.clone());
        Ok(stored)
    }

    async fn delete_user(&self, id: &UserId) -> Result<(), StorageError> {
        let mut tables = self.lock()?;
        tables.users.remove(id);
        tables.cart_items.retain(|item| &item.user_id != id);
        Ok(())
    }

    async fn list_products(&self) -> Result<Vec<Product>, StorageError> {
        let tables = self.lock()?;
        Ok(newest_first(tables.products.iter().cloned(), |p| p.created_at))
    }

    async fn list_products_by_category(
        &self,
        category: &str,
    ) -> Result<Vec<Product>, StorageError> {
        let tables = self.lock()?;
        let matching = tables
            .products
            .iter()
            .filter(|product| product.category == category)
            .cloned();
        Ok(newest_first(matching, |p| p.created_at))
    }

    async fn get_product_by_id(&self, id: &ProductId) -> Result<Option<Product>, StorageError> {
        Ok(self.lock()?.product(id).cloned())
    }

    async fn create_product(&self, product: &NewProduct) -> Result<Product, StorageError> {
        let now = self.now();
        let mut tables = self.lock()?;
        if tables
            .products
            .iter()
            .any(|existing| existing.part_number == product.part_number)
        {
            return Err(StorageError::conflict(format!(
                "part number {} already exists",
                product.part_number
            )));
        }
        let stored = Product {
            id: ProductId::random(),
            name: product.name.clone(),
            part_number: product.part_number.clone(),
            description: product.description.clone(),
            category: product.category.clone(),
            price: product.price,
            stock: product.stock,
            image_url: product.image_url.clone(),
            compatible_models: product.compatible_models.clone(),
            created_at: now,
        };
        tables.products.push(stored.clone());
        Ok(stored)
    }

    async fn delete_product(&self, id: &ProductId) -> Result<(), StorageError> {
        let mut tables = self.lock()?;
        tables.products.retain(|product| &product.id != id);
        tables.cart_items.retain(|item| &item.product_id != id);
        Ok(())
    }

    async fn list_cart_items_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<CartItemWithProduct>, StorageError> {
        let tables = self.lock()?;
        let joined = tables
            .cart_items
            .iter()
            .filter(|item| &item.user_id == user_id)
            .filter_map(|item| {
                tables.product(&item.product_id).map(|product| CartItemWithProduct {
                    item: item.clone(),
                    product: product.clone(),
                })
            })
            .collect::<Vec<_>>();
        Ok(newest_first(joined.into_iter(), |row| row.item.created_at))
    }

    async fn get_cart_item(
        &self,
        user_id: &UserId,
        product_id: &ProductId,
    ) -> Result<Option<CartItem>, StorageError> {
        Ok(self
            .lock()?
            .cart_items
            .iter()
            .find(|item| &item.user_id == user_id && &item.product_id == product_id)
            .cloned())
    }

    async fn find_cart_item(&self, id: &CartItemId) -> Result<Option<CartItem>, StorageError> {
        Ok(self
            .lock()?
            .cart_items
            .iter()
            .find(|item| &item.id == id)
            .cloned())
    }

    async fn add_cart_item(
        &self,
        user_id: &UserId,
        product_id: &ProductId,
        quantity: Quantity,
    ) -> Result<CartItem, StorageError> {
        let now = self.now();
        let mut tables = self.lock()?;
        if !tables.users.contains_key(user_id) {
            return Err(StorageError::query("cart item references an unknown user"));
        }
        if tables.product(product_id).is_none() {
            return Err(StorageError::query("cart item references an unknown product"));
        }

        let existing = tables
            .cart_items
            .iter_mut()
            .find(|item| &item.user_id == user_id && &item.product_id == product_id);
        if let Some(item) = existing {
            item.quantity = item
                .quantity
                .checked_add(quantity.get())
                .filter(|total| i64::from(*total) <= Quantity::MAX)
                .ok_or_else(|| {
                    StorageError::out_of_range(format!(
                        "cart item quantity cannot exceed {}",
                        Quantity::MAX
                    ))
                })?;
            item.updated_at = now;
            return Ok(item.clone());
        }

        let item = CartItem {
            id: CartItemId::random(),
            user_id: user_id.clone(),
            product_id: *product_id,
            quantity: quantity.get(),
            created_at: now,
            updated_at: now,
        };
        tables.cart_items.push(item.clone());
        Ok(item)
    }

    async fn update_cart_item_quantity(
        &self,
        id: &CartItemId,
        quantity: Quantity,
    ) -> Result<CartItem, StorageError> {
        let now = self.now();
        let mut tables = self.lock()?;
        let item = tables
            .cart_items
            .iter_mut()
            .find(|item| &item.id == id)
            .ok_or_else(|| StorageError::not_found(format!("cart item {id}")))?;
        item.quantity = quantity.get();
        item.updated_at = now;
        Ok(item.clone())
    }

    async fn delete_cart_item(&self, id: &CartItemId) -> Result<(), StorageError> {
        self.lock()?.cart_items.retain(|item| &item.id != id);
        Ok(())
    }

    async fn clear_cart(&self, user_id: &UserId) -> Result<(), StorageError> {
        self.lock()?.cart_items.retain(|item| &item.user_id != user_id);
        Ok(())
    }
}

#[cfg(test)]
#[path = "memory_tests.rs"]
mod tests;
