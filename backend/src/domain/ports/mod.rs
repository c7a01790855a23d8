//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod account_command;
mod account_query;
mod cart_command;
mod cart_query;
mod catalogue_query;
mod identity_provider;
mod storage;

pub use account_command::AccountCommand;
pub use account_query::AccountQuery;
#[cfg(test)]
pub use cart_command::MockCartCommand;
pub use cart_command::{
    AddCartItemRequest, CartCommand, RemoveCartItemRequest, UpdateCartItemRequest,
};
#[cfg(test)]
pub use cart_query::MockCartQuery;
pub use cart_query::CartQuery;
pub use catalogue_query::CatalogueQuery;
pub use identity_provider::{FixtureIdentityProvider, IdentityProvider, IdentityProviderError};
#[cfg(test)]
pub use storage::MockStorage;
pub use storage::{Storage, StorageError};
