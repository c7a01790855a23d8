//! PostgreSQL persistence via Diesel, `diesel-async` and a bb8 pool.
//!
//! Row structs and the table definitions stay private to this module; only
//! the [`DieselStorage`] adapter, the pool and the migration runner are
//! exported.

mod diesel_error_mapping;
mod diesel_storage;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_storage::DieselStorage;
pub use migrations::run_migrations;
pub use pool::{DbPool, PoolConfig, PoolError};
