//! Page models for the storefront.
//!
//! [`Storefront`] reads through the [`QueryCache`] and the injected
//! [`StorefrontApi`]; cart mutations invalidate [`CART_KEY`] so the next cart
//! read refetches.

use std::future::Future;
use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::debug;

use super::cache::QueryCache;
use super::catalogue::{CATEGORIES, CatalogueFilter, Category, apply_filter};
use super::client::{ClientError, StorefrontApi};
use super::feedback::{CartAction, Feedback, failure_feedback, success_feedback};
use super::totals::{
    CartTotals, StepperBounds, StockBadge, cart_count, cart_totals, format_price, line_total,
};
use crate::domain::{CartItemId, CartItemWithProduct, Product, ProductId, User};

/// Cache key for the product list.
pub const PRODUCTS_KEY: &str = "/api/products";
/// Cache key for the signed-in user's cart.
pub const CART_KEY: &str = "/api/cart";
/// Cache key for the session user.
pub const USER_KEY: &str = "/api/auth/user";
/// Products highlighted on the home page.
pub const FEATURED_COUNT: usize = 4;

/// Top-level pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    /// Public marketing page with the sign-in call to action.
    Landing,
    /// Signed-in welcome page.
    Home,
    /// Public catalogue.
    Shop,
    /// Signed-in cart.
    Cart,
    /// Any other path.
    NotFound,
}

impl Page {
    /// Resolve `path` for a visitor.
    ///
    /// The catalogue is public; home and cart fall back to the landing page
    /// for anonymous visitors.
    ///
    /// # Examples
    /// ```
    /// use storefront::presentation::Page;
    ///
    /// assert_eq!(Page::resolve("/cart", false), Page::Landing);
    /// assert_eq!(Page::resolve("/shop", false), Page::Shop);
    /// ```
    #[must_use]
    pub fn resolve(path: &str, authenticated: bool) -> Self {
        match (path, authenticated) {
            ("/shop", _) => Self::Shop,
            ("/cart", true) => Self::Cart,
            ("/", true) => Self::Home,
            ("/" | "/cart", false) => Self::Landing,
            _ => Self::NotFound,
        }
    }
}

/// A product as rendered in a grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductCard {
    pub product: Product,
    /// Availability shown on the card.
    pub badge: StockBadge,
    /// Formatted unit price, e.g. `45,99 €`.
    pub price: String,
}

impl ProductCard {
    fn new(product: Product) -> Self {
        Self {
            badge: StockBadge::for_product(&product),
            price: format_price(product.price),
            product,
        }
    }

    /// Whether the add-to-cart button is enabled.
    #[must_use]
    pub const fn can_add_to_cart(&self) -> bool {
        self.badge.can_add_to_cart()
    }
}

/// Signed-in home page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HomeView {
    /// Greeting target; `None` only if the session lapsed mid-render.
    pub user: Option<User>,
    /// The first [`FEATURED_COUNT`] products as served.
    pub featured: Vec<ProductCard>,
    /// Category tiles linking into the catalogue.
    pub categories: &'static [Category],
}

/// Catalogue page after filtering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogView {
    pub products: Vec<ProductCard>,
    /// Result count, or the empty-state hint.
    pub summary: String,
}

/// One line of the cart page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLine {
    pub line: CartItemWithProduct,
    /// Formatted product price.
    pub unit_price: String,
    /// Price times quantity.
    pub line_total: Decimal,
    /// Which quantity buttons are enabled.
    pub stepper: StepperBounds,
}

/// Cart page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartView {
    pub lines: Vec<CartLine>,
    pub totals: CartTotals,
    /// Sum of quantities, as on the navbar badge.
    pub item_count: u64,
}

impl CartView {
    /// Whether the empty-cart state is shown.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Storefront presentation service.
#[derive(Clone)]
pub struct Storefront {
    api: Arc<dyn StorefrontApi>,
    cache: QueryCache,
}

impl Storefront {
    /// Wire the views over `api`, reading through `cache`.
    pub fn new(api: Arc<dyn StorefrontApi>, cache: QueryCache) -> Self {
        Self { api, cache }
    }

    /// The shared cache.
    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    async fn cached<T, F, Fut>(&self, key: &str, fetch: F) -> Result<T, ClientError>
    where
        T: Clone + Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, ClientError>>,
    {
        if let Some(hit) = self.cache.get::<T>(key) {
            return Ok(hit);
        }
        let fresh = fetch().await?;
        self.cache.put(key, fresh.clone());
        Ok(fresh)
    }

    /// Sign in and drop everything cached for the previous visitor.
    ///
    /// # Errors
    /// Propagates the client failure.
    pub async fn sign_in(&self) -> Result<(), ClientError> {
        self.api.login().await?;
        self.cache.clear();
        Ok(())
    }

    /// Sign out and drop cached state.
    ///
    /// # Errors
    /// Propagates the client failure.
    pub async fn sign_out(&self) -> Result<(), ClientError> {
        self.api.logout().await?;
        self.cache.clear();
        Ok(())
    }

    /// The session user, or `None` for anonymous visitors.
    ///
    /// # Errors
    /// Failures other than a missing session are propagated.
    pub async fn session_user(&self) -> Result<Option<User>, ClientError> {
        let api = self.api.clone();
        match self
            .cached(USER_KEY, || async move { api.current_user().await })
            .await
        {
            Ok(user) => Ok(Some(user)),
            Err(error) if error.is_unauthorized() => Ok(None),
            Err(error) => Err(error),
        }
    }

    /// Resolve the page for `path` against the current session.
    ///
    /// # Errors
    /// Propagates failures from [`Self::session_user`].
    pub async fn page(&self, path: &str) -> Result<Page, ClientError> {
        let authenticated = self.session_user().await?.is_some();
        Ok(Page::resolve(path, authenticated))
    }

    /// Full product list, newest first as served.
    ///
    /// # Errors
    /// Propagates the client failure.
    pub async fn products(&self) -> Result<Vec<Product>, ClientError> {
        let api = self.api.clone();
        self.cached(PRODUCTS_KEY, || async move { api.list_products(None).await })
            .await
    }

    /// The signed-in user's cart.
    ///
    /// # Errors
    /// Propagates the client failure, including [`ClientError::Unauthorized`].
    pub async fn cart(&self) -> Result<Vec<CartItemWithProduct>, ClientError> {
        let api = self.api.clone();
        self.cached(CART_KEY, || async move { api.list_cart().await })
            .await
    }

    /// Navbar badge; an unreadable cart counts as empty.
    pub async fn cart_badge(&self) -> u64 {
        match self.cart().await {
            Ok(lines) => cart_count(&lines),
            Err(error) => {
                debug!(error = %error, "cart badge falls back to zero");
                0
            }
        }
    }

    /// Home page: first [`FEATURED_COUNT`] products plus the category tiles.
    ///
    /// # Errors
    /// Propagates the client failure.
    pub async fn home(&self) -> Result<HomeView, ClientError> {
        let user = self.session_user().await?;
        let featured = self
            .products()
            .await?
            .into_iter()
            .take(FEATURED_COUNT)
            .map(ProductCard::new)
            .collect();
        Ok(HomeView {
            user,
            featured,
            categories: &CATEGORIES,
        })
    }

    /// Catalogue page recomputed from the full list.
    ///
    /// # Errors
    /// Propagates the client failure.
    pub async fn catalog(&self, filter: &CatalogueFilter) -> Result<CatalogView, ClientError> {
        let products: Vec<ProductCard> = apply_filter(&self.products().await?, filter)
            .into_iter()
            .map(ProductCard::new)
            .collect();
        let summary = if products.is_empty() {
            "Nessun prodotto trovato. Prova a modificare i filtri.".to_owned()
        } else {
            format!("{} prodotti trovati", products.len())
        };
        Ok(CatalogView { products, summary })
    }

    /// Cart page with totals and stepper bounds.
    ///
    /// # Errors
    /// Propagates the client failure.
    pub async fn cart_view(&self) -> Result<CartView, ClientError> {
        let cart = self.cart().await?;
        let totals = cart_totals(&cart);
        let item_count = cart_count(&cart);
        let lines = cart
            .into_iter()
            .map(|line| CartLine {
                unit_price: format_price(line.product.price),
                line_total: line_total(&line),
                stepper: StepperBounds::new(line.item.quantity, line.product.stock),
                line,
            })
            .collect();
        Ok(CartView {
            lines,
            totals,
            item_count,
        })
    }

    /// Add one unit of `product_id`.
    pub async fn add_to_cart(&self, product_id: ProductId) -> Feedback {
        let result = self.api.add_to_cart(product_id, 1).await.map(|_| ());
        self.settle(CartAction::Add, result)
    }

    /// Set a line's quantity.
    pub async fn set_quantity(&self, id: CartItemId, quantity: u32) -> Feedback {
        let result = self.api.update_quantity(id, quantity).await.map(|_| ());
        self.settle(CartAction::UpdateQuantity, result)
    }

    /// Remove a line.
    pub async fn remove_from_cart(&self, id: CartItemId) -> Feedback {
        let result = self.api.remove_from_cart(id).await;
        self.settle(CartAction::Remove, result)
    }

    fn settle(&self, action: CartAction, result: Result<(), ClientError>) -> Feedback {
        match result {
            Ok(()) => {
                self.cache.invalidate(CART_KEY);
                success_feedback(action)
            }
            Err(error) => {
                debug!(?action, error = %error, "cart mutation failed");
                failure_feedback(action, &error)
            }
        }
    }
}

#[cfg(test)]
#[path = "views_tests.rs"]
mod tests;
