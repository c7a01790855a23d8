//! Storefront presentation layer.
//!
//! Drives the REST API through the [`StorefrontApi`] port and turns its
//! responses into page models: catalogue search, filtering and sorting, cart
//! totals with the shipping rule, stock badges and mutation feedback. Reads
//! go through a path-keyed [`QueryCache`].

pub mod cache;
pub mod catalogue;
pub mod client;
pub mod feedback;
pub mod totals;
pub mod views;

pub use cache::QueryCache;
pub use catalogue::{CatalogueFilter, CategoryFilter, SortOrder};
pub use client::{ClientError, HttpStorefrontApi, StorefrontApi};
pub use feedback::Feedback;
pub use totals::{CartTotals, StockBadge, format_price};
pub use views::{CartView, CatalogView, HomeView, Page, Storefront};
