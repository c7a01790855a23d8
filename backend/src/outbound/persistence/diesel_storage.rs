//! PostgreSQL-backed `Storage` adapter.
//!
//! Ordering, the cart/product inner join and the atomic merge-on-add are all
//! pushed down into SQL; this module only converts rows.

use async_trait::async_trait;
use diesel::dsl::now;
use diesel::prelude::*;
use diesel::upsert::excluded;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{Storage, StorageError};
use crate::domain::{
    CartItem, CartItemId, CartItemWithProduct, NewProduct, Product, ProductId, Quantity,
    UpsertUser, User, UserId,
};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::{
    CartItemRow, NewCartItemRow, NewProductRow, NewUserRow, ProductRow, UserRow,
};
use super::pool::DbPool;
use super::schema::{cart_items, products, users};

/// Diesel implementation of [`Storage`].
#[derive(Clone)]
pub struct DieselStorage {
    pool: DbPool,
}

impl DieselStorage {
    /// Create a storage adapter over `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn user_from_row(row: UserRow) -> Result<User, StorageError> {
    let id = UserId::new(row.id).map_err(|err| StorageError::query(err.to_string()))?;
    Ok(User {
        id,
        email: row.email,
        first_name: row.first_name,
        last_name: row.last_name,
        profile_image_url: row.profile_image_url,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

fn product_from_row(row: ProductRow) -> Result<Product, StorageError> {
    let stock = u32::try_from(row.stock)
        .map_err(|_| StorageError::query(format!("negative stock for product {}", row.id)))?;
    Ok(Product {
        id: ProductId::from_uuid(row.id),
        name: row.name,
        part_number: row.part_number,
        description: row.description,
        category: row.category,
        price: row.price,
        stock,
        image_url: row.image_url,
        compatible_models: row.compatible_models,
        created_at: row.created_at,
    })
}

fn cart_item_from_row(row: CartItemRow) -> Result<CartItem, StorageError> {
    let user_id = UserId::new(row.user_id).map_err(|err| StorageError::query(err.to_string()))?;
    let quantity = u32::try_from(row.quantity)
        .map_err(|_| StorageError::query(format!("invalid quantity for cart item {}", row.id)))?;
    Ok(CartItem {
        id: CartItemId::from_uuid(row.id),
        user_id,
        product_id: ProductId::from_uuid(row.product_id),
        quantity,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

fn to_column_int(value: u32, what: &str) -> Result<i32, StorageError> {
    i32::try_from(value).map_err(|_| StorageError::query(format!("{what} exceeds column range")))
}

#[async_trait]
impl Storage for DieselStorage {
    async fn get_user(&self, id: &UserId) -> Result<Option<User>, StorageError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<UserRow> = users::table
            .find(id.as_ref())
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(user_from_row).transpose()
    }

    async fn upsert_user(&self, user: &UpsertUser) -> Result<User, StorageError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewUserRow {
            id: user.id.as_ref(),
            email: user.email.as_deref(),
            first_name: user.first_name.as_deref(),
            last_name: user.last_name.as_deref(),
            profile_image_url: user.profile_image_url.as_deref(),
        };
        let stored: UserRow = diesel::insert_into(users::table)
            .values(&row)
            .on_conflict(users::id)
            .do_update()
            .set((
                users::email.eq(excluded(users::email)),
                users::first_name.eq(excluded(users::first_name)),
                users::last_name.eq(excluded(users::last_name)),
                users::profile_image_url.eq(excluded(users::profile_image_url)),
                users::updated_at.eq(now),
            ))
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        user_from_row(stored)
    }

    async fn delete_user(&self, id: &UserId) -> Result<(), StorageError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::delete(users::table.find(id.as_ref()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(())
    }

    async fn list_products(&self) -> Result<Vec<Product>, StorageError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<ProductRow> = products::table
            .select(ProductRow::as_select())
            .order(products::created_at.desc())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(product_from_row).collect()
    }

    async fn list_products_by_category(
        &self,
        category: &str,
    ) -> Result<Vec<Product>, StorageError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<ProductRow> = products::table
            .filter(products::category.eq(category))
            .select(ProductRow::as_select())
            .order(products::created_at.desc())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(product_from_row).collect()
    }

    async fn get_product_by_id(&self, id: &ProductId) -> Result<Option<Product>, StorageError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<ProductRow> = products::table
            .find(*id.as_uuid())
            .select(ProductRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(product_from_row).transpose()
    }

    async fn create_product(&self, product: &NewProduct) -> Result<Product, StorageError> {
        let row = NewProductRow {
            id: Uuid::new_v4(),
            name: &product.name,
            part_number: &product.part_number,
            description: &product.description,
            category: &product.category,
            price: product.price,
            stock: to_column_int(product.stock, "stock")?,
            image_url: product.image_url.as_deref(),
            compatible_models: &product.compatible_models,
        };
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let stored: ProductRow = diesel::insert_into(products::table)
            .values(&row)
            .returning(ProductRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        product_from_row(stored)
    }

    async fn delete_product(&self, id: &ProductId) -> Result<(), StorageError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::delete(products::table.find(*id.as_uuid()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(())
    }

    async fn list_cart_items_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<CartItemWithProduct>, StorageError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<(CartItemRow, ProductRow)> = cart_items::table
            .inner_join(products::table)
            .filter(cart_items::user_id.eq(user_id.as_ref()))
            .order(cart_items::created_at.desc())
            .select((CartItemRow::as_select(), ProductRow::as_select()))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter()
            .map(|(item, product)| {
                Ok(CartItemWithProduct {
                    item: cart_item_from_row(item)?,
                    product: product_from_row(product)?,
                })
            })
            .collect()
    }

    async fn get_cart_item(
        &self,
        user_id: &UserId,
        product_id: &ProductId,
    ) -> Result<Option<CartItem>, StorageError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<CartItemRow> = cart_items::table
            .filter(cart_items::user_id.eq(user_id.as_ref()))
            .filter(cart_items::product_id.eq(product_id.as_uuid()))
            .select(CartItemRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(cart_item_from_row).transpose()
    }

    async fn find_cart_item(&self, id: &CartItemId) -> Result<Option<CartItem>, StorageError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<CartItemRow> = cart_items::table
            .find(*id.as_uuid())
            .select(CartItemRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(cart_item_from_row).transpose()
    }

    async fn add_cart_item(
        &self,
        user_id: &UserId,
        product_id: &ProductId,
        quantity: Quantity,
    ) -> Result<CartItem, StorageError> {
        let row = NewCartItemRow {
            id: Uuid::new_v4(),
            user_id: user_id.as_ref(),
            product_id: *product_id.as_uuid(),
            quantity: to_column_int(quantity.get(), "quantity")?,
        };
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        // One statement, so concurrent adds for the same pair both land.
        let stored: CartItemRow = diesel::insert_into(cart_items::table)
            .values(&row)
            .on_conflict((cart_items::user_id, cart_items::product_id))
            .do_update()
            .set((
                cart_items::quantity.eq(cart_items::quantity + excluded(cart_items::quantity)),
                cart_items::updated_at.eq(now),
            ))
            .returning(CartItemRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        cart_item_from_row(stored)
    }

    async fn update_cart_item_quantity(
        &self,
        id: &CartItemId,
        quantity: Quantity,
    ) -> Result<CartItem, StorageError> {
        let quantity = to_column_int(quantity.get(), "quantity")?;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let stored: Option<CartItemRow> = diesel::update(cart_items::table.find(*id.as_uuid()))
            .set((
                cart_items::quantity.eq(quantity),
                cart_items::updated_at.eq(now),
            ))
            .returning(CartItemRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        let stored = stored.ok_or_else(|| StorageError::not_found(format!("cart item {id}")))?;
        cart_item_from_row(stored)
    }

    async fn delete_cart_item(&self, id: &CartItemId) -> Result<(), StorageError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::delete(cart_items::table.find(*id.as_uuid()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(())
    }

    async fn clear_cart(&self, user_id: &UserId) -> Result<(), StorageError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::delete(cart_items::table.filter(cart_items::user_id.eq(user_id.as_ref())))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(())
    }
}
