//! Shared HTTP adapter state.
//!
//! Handlers receive this through `web::Data` and only see driving ports, so
//! they can be exercised without a database.

use std::sync::Arc;

use crate::domain::ports::{
    AccountCommand, AccountQuery, CartCommand, CartQuery, CatalogueQuery, IdentityProvider,
    Storage,
};
use crate::domain::{AccountService, CartService, CatalogueService};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub accounts: Arc<dyn AccountCommand>,
    pub account_query: Arc<dyn AccountQuery>,
    pub catalogue: Arc<dyn CatalogueQuery>,
    pub cart: Arc<dyn CartCommand>,
    pub cart_query: Arc<dyn CartQuery>,
}

impl HttpState {
    /// Wire the domain services over one storage adapter.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use storefront::domain::ports::FixtureIdentityProvider;
    /// use storefront::inbound::http::state::HttpState;
    /// use storefront::outbound::InMemoryStorage;
    ///
    /// let state = HttpState::from_storage(
    ///     Arc::new(InMemoryStorage::new()),
    ///     Arc::new(FixtureIdentityProvider::default()),
    /// );
    /// let _cart = state.cart.clone();
    /// ```
    pub fn from_storage(storage: Arc<dyn Storage>, identity: Arc<dyn IdentityProvider>) -> Self {
        let accounts = Arc::new(AccountService::new(storage.clone(), identity));
        let cart = Arc::new(CartService::new(storage.clone()));
        Self {
            accounts: accounts.clone(),
            account_query: accounts,
            catalogue: Arc::new(CatalogueService::new(storage)),
            cart: cart.clone(),
            cart_query: cart,
        }
    }
}
