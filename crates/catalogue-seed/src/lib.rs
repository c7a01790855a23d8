//! Seed product sets for the storefront catalogue.
//!
//! A registry is a versioned JSON document holding named product sets. The
//! crate parses and validates the document and leaves persistence to the
//! caller, so it carries no dependency on the backend's domain types.
//!
//! # Example
//!
//! ```
//! use catalogue_seed::CatalogueRegistry;
//!
//! let json = r#"{
//!     "version": 1,
//!     "sets": [{
//!         "name": "demo",
//!         "products": [{
//!             "name": "MT-09 Filtro Olio Originale",
//!             "partNumber": "5GH-13440-70",
//!             "description": "Filtro olio originale",
//!             "category": "engine",
//!             "price": "18.50",
//!             "stock": 45,
//!             "compatibleModels": ["MT-09 2014-2023"]
//!         }]
//!     }]
//! }"#;
//!
//! let registry = CatalogueRegistry::from_json(json).expect("valid registry");
//! let set = registry.find_set("demo").expect("set exists");
//! assert_eq!(set.products().len(), 1);
//! ```

mod error;
mod registry;
mod validation;

pub use error::RegistryError;
pub use registry::{CatalogueRegistry, ProductSeed, ProductSet};
pub use validation::{PRICE_MAX_FRACTION_DIGITS, is_valid_price};
