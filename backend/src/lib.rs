//! Motorcycle parts storefront: catalogue browsing, per-user carts and
//! session-gated REST endpoints.
//!
//! The crate is laid out hexagonally:
//! - [`domain`] holds entities, errors, driving/driven ports and services.
//! - [`inbound`] adapts HTTP requests onto the driving ports.
//! - [`outbound`] implements the storage port for PostgreSQL and memory.
//! - [`presentation`] drives the REST API and builds the storefront pages.

pub mod catalogue_seeding;
pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod presentation;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
