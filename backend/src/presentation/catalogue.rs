//! Catalogue search, category filtering and sorting.
//!
//! The pipeline always starts from the full product list: search, then
//! category, then sort.

use std::cmp::Ordering;
use std::str::FromStr;

use crate::domain::Product;

/// A browsable category with its shop label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Category {
    /// Value stored on products.
    pub id: &'static str,
    /// Italian label shown in the shop.
    pub label: &'static str,
}

/// Categories offered by the shop, in display order.
pub const CATEGORIES: [Category; 4] = [
    Category {
        id: "engine",
        label: "Motore",
    },
    Category {
        id: "brakes",
        label: "Freni",
    },
    Category {
        id: "transmission",
        label: "Trasmissione",
    },
    Category {
        id: "electrical",
        label: "Elettrica",
    },
];

/// Category selector value meaning "no filter".
pub const ALL_CATEGORIES: &str = "all";

/// Category selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    /// Every product passes.
    #[default]
    All,
    /// Only products whose category equals the value exactly.
    Only(String),
}

impl From<&str> for CategoryFilter {
    fn from(value: &str) -> Self {
        if value == ALL_CATEGORIES {
            Self::All
        } else {
            Self::Only(value.to_owned())
        }
    }
}

impl CategoryFilter {
    fn admits(&self, product: &Product) -> bool {
        match self {
            Self::All => true,
            Self::Only(category) => &product.category == category,
        }
    }
}

/// Sort order for the catalogue grid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    /// Alphabetical by name.
    #[default]
    Name,
    /// Cheapest first.
    PriceAsc,
    /// Most expensive first.
    PriceDesc,
}

/// Error returned when parsing an unknown sort key.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown sort order: {0}")]
pub struct UnknownSortOrder(pub String);

impl FromStr for SortOrder {
    type Err = UnknownSortOrder;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "name" => Ok(Self::Name),
            "price-asc" => Ok(Self::PriceAsc),
            "price-desc" => Ok(Self::PriceDesc),
            other => Err(UnknownSortOrder(other.to_owned())),
        }
    }
}

impl SortOrder {
    fn compare(self, a: &Product, b: &Product) -> Ordering {
        match self {
            Self::Name => compare_names(&a.name, &b.name),
            Self::PriceAsc => a.price.cmp(&b.price),
            Self::PriceDesc => b.price.cmp(&a.price),
        }
    }
}

/// Case-insensitive ordering with a byte-order tiebreak.
fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Search, category and sort settings for the catalogue view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogueFilter {
    /// Free-text query; empty matches everything.
    pub search: String,
    /// Category selection.
    pub category: CategoryFilter,
    /// Result order.
    pub sort: SortOrder,
}

/// Whether `product` matches `query` by name, part number or description.
///
/// Matching is a case-insensitive substring test; an empty query matches.
///
/// # Examples
/// ```
/// # use storefront::presentation::catalogue::matches_search;
/// # use storefront::domain::{Product, ProductId};
/// # use chrono::Utc;
/// # use rust_decimal::Decimal;
/// let product = Product {
///     id: ProductId::random(),
///     name: "Pastiglie Freno".into(),
///     part_number: "5VU-W0045-00".into(),
///     description: "Pastiglie anteriori".into(),
///     category: "brakes".into(),
///     price: Decimal::new(4599, 2),
///     stock: 12,
///     image_url: None,
///     compatible_models: vec![],
///     created_at: Utc::now(),
/// };
/// assert!(matches_search(&product, "w0045"));
/// assert!(!matches_search(&product, "catena"));
/// ```
#[must_use]
pub fn matches_search(product: &Product, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }
    let needle = query.to_lowercase();
    [&product.name, &product.part_number, &product.description]
        .into_iter()
        .any(|field| field.to_lowercase().contains(&needle))
}

/// Apply `filter` to `products`, returning a fresh list.
#[must_use]
pub fn apply_filter(products: &[Product], filter: &CatalogueFilter) -> Vec<Product> {
    let mut filtered: Vec<Product> = products
        .iter()
        .filter(|product| matches_search(product, &filter.search))
        .filter(|product| filter.category.admits(product))
        .cloned()
        .collect();
    filtered.sort_by(|a, b| filter.sort.compare(a, b));
    filtered
}
