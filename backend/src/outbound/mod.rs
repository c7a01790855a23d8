//! Outbound adapters implementing the domain's driven ports.
//!
//! - **persistence**: PostgreSQL storage through Diesel.
//! - **memory**: mutex-guarded storage used by tests and database-less runs.
//!
//! Adapters translate between domain types and their backing store and hold
//! no business rules.

pub mod memory;
pub mod persistence;

pub use memory::InMemoryStorage;
