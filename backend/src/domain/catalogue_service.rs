//! Catalogue use-cases.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::cart_service::PRODUCT_NOT_FOUND;
use crate::domain::ports::{CatalogueQuery, Storage};
use crate::domain::{Error, Product, ProductId};

/// Read-only catalogue service over a storage adapter.
#[derive(Clone)]
pub struct CatalogueService<S: ?Sized> {
    storage: Arc<S>,
}

impl<S: ?Sized> CatalogueService<S> {
    /// Create a service backed by `storage`.
    pub const fn new(storage: Arc<S>) -> Self {
        Self { storage }
    }
}

#[async_trait]
impl<S> CatalogueQuery for CatalogueService<S>
where
    S: Storage + ?Sized,
{
    async fn list_products(&self, category: Option<&str>) -> Result<Vec<Product>, Error> {
        let products = match category {
            Some(category) => self.storage.list_products_by_category(category).await?,
            None => self.storage.list_products().await?,
        };
        Ok(products)
    }

    async fn get_product(&self, id: &ProductId) -> Result<Product, Error> {
        self.storage
            .get_product_by_id(id)
            .await?
            .ok_or_else(|| Error::not_found(PRODUCT_NOT_FOUND))
    }
}
