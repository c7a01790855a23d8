//! Error types for registry parsing and validation.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading, validating or querying a registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// The registry file could not be read.
    #[error("failed to read registry file at '{path}': {message}")]
    IoError {
        /// Path to the registry file.
        path: PathBuf,
        /// Description of the I/O error.
        message: String,
    },

    /// The registry JSON is malformed or missing required fields.
    #[error("invalid registry JSON: {message}")]
    ParseError {
        /// Description of the parse error.
        message: String,
    },

    /// The registry version is not supported.
    #[error("unsupported registry version: expected {expected}, found {actual}")]
    UnsupportedVersion {
        /// Expected version number.
        expected: u32,
        /// Version found in the registry.
        actual: u32,
    },

    /// The registry holds no product sets.
    #[error("registry contains no product sets")]
    EmptySets,

    /// Two sets share a name.
    #[error("product set '{name}' is defined more than once")]
    DuplicateSetName {
        /// The repeated set name.
        name: String,
    },

    /// A set holds no products.
    #[error("product set '{set}' contains no products")]
    EmptyProducts {
        /// Name of the empty set.
        set: String,
    },

    /// A required text field is blank.
    #[error("product {index} in set '{set}' has a blank {field}")]
    BlankField {
        /// Name of the set holding the product.
        set: String,
        /// Position of the product within the set.
        index: usize,
        /// The blank field.
        field: &'static str,
    },

    /// A price is not a positive decimal with at most two fractional digits.
    #[error("product '{part_number}' in set '{set}' has invalid price '{value}'")]
    InvalidPrice {
        /// Name of the set holding the product.
        set: String,
        /// Part number of the offending product.
        part_number: String,
        /// The rejected price.
        value: String,
    },

    /// Two products in a set share a part number.
    #[error("part number '{part_number}' appears more than once in set '{set}'")]
    DuplicatePartNumber {
        /// Name of the set holding the products.
        set: String,
        /// The repeated part number.
        part_number: String,
    },

    /// The requested set name was not found.
    #[error("product set '{name}' not found in registry")]
    SetNotFound {
        /// The set name that was not found.
        name: String,
    },
}
