//! Domain primitives, aggregates and services.
//!
//! Purpose: define the storefront entities shared by the API and persistence
//! layers, the ports that connect them, and the services that enforce the
//! cart rules. Types here stay free of HTTP and SQL concerns.
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failure payload.
//! - User, Product, CartItem and their identifiers.
//! - AccountService, CatalogueService, CartService: driving port impls.

pub mod account_service;
pub mod cart;
pub mod cart_service;
pub mod catalogue_service;
pub mod error;
pub mod ports;
pub mod product;
pub mod trace_id;
pub mod user;

pub use self::account_service::AccountService;
pub use self::cart::{
    CartItem, CartItemId, CartItemWithProduct, Quantity, QuantityValidationError,
};
pub use self::cart_service::CartService;
pub use self::catalogue_service::CatalogueService;
pub use self::error::{Error, ErrorCode, TRACE_ID_HEADER};
pub use self::product::{NewProduct, Product, ProductId, ProductValidationError};
pub use self::trace_id::TraceId;
pub use self::user::{UpsertUser, User, UserId, UserValidationError};
