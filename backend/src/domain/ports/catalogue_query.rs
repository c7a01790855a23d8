//! Driving port for browsing the catalogue.

use async_trait::async_trait;

use crate::domain::{Error, Product, ProductId};

/// Public catalogue reads.
#[async_trait]
pub trait CatalogueQuery: Send + Sync {
    /// All products, or only those in `category`, newest first.
    async fn list_products(&self, category: Option<&str>) -> Result<Vec<Product>, Error>;

    /// A single product; `NotFound` when absent.
    async fn get_product(&self, id: &ProductId) -> Result<Product, Error>;
}
