//! Registry types and JSON parsing.

use std::collections::HashSet;
use std::path::Path;

use cap_std::{ambient_authority, fs::Dir};
use serde::{Deserialize, Serialize};

use crate::error::RegistryError;
use crate::validation::validate_set;

/// Registry version understood by this crate.
const SUPPORTED_VERSION: u32 = 1;

/// A validated registry of named product sets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogueRegistry {
    version: u32,
    sets: Vec<ProductSet>,
}

impl CatalogueRegistry {
    /// Parses and validates a registry from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError`] if:
    /// - The JSON is malformed or misses required fields
    /// - The version is unsupported
    /// - There are no sets, or two sets share a name
    /// - Any product fails validation
    pub fn from_json(json: &str) -> Result<Self, RegistryError> {
        let raw: RawRegistry =
            serde_json::from_str(json).map_err(|e| RegistryError::ParseError {
                message: e.to_string(),
            })?;

        Self::from_raw(raw)
    }

    /// Loads a registry from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::IoError`] if the file cannot be read, or any
    /// error from [`CatalogueRegistry::from_json`].
    pub fn from_file(path: &Path) -> Result<Self, RegistryError> {
        let io_error = |message: String| RegistryError::IoError {
            path: path.to_path_buf(),
            message,
        };
        let parent = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let file_name = path
            .file_name()
            .ok_or_else(|| io_error("registry path must be a file".to_owned()))?;
        let dir = Dir::open_ambient_dir(parent, ambient_authority())
            .map_err(|e| io_error(e.to_string()))?;
        let contents = dir
            .read_to_string(Path::new(file_name))
            .map_err(|e| io_error(e.to_string()))?;

        Self::from_json(&contents)
    }

    fn from_raw(raw: RawRegistry) -> Result<Self, RegistryError> {
        if raw.version != SUPPORTED_VERSION {
            return Err(RegistryError::UnsupportedVersion {
                expected: SUPPORTED_VERSION,
                actual: raw.version,
            });
        }
        if raw.sets.is_empty() {
            return Err(RegistryError::EmptySets);
        }

        let mut names = HashSet::new();
        for set in &raw.sets {
            if !names.insert(set.name.as_str()) {
                return Err(RegistryError::DuplicateSetName {
                    name: set.name.clone(),
                });
            }
            validate_set(&set.name, &set.products)?;
        }

        let sets = raw
            .sets
            .into_iter()
            .map(|set| ProductSet {
                name: set.name,
                products: set.products,
            })
            .collect();

        Ok(Self {
            version: raw.version,
            sets,
        })
    }

    /// Returns the registry version.
    #[must_use]
    pub const fn version(&self) -> u32 {
        self.version
    }

    /// Returns all product sets in file order.
    #[must_use]
    pub fn sets(&self) -> &[ProductSet] {
        &self.sets
    }

    /// Finds a product set by name.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::SetNotFound`] if no set has the given name.
    pub fn find_set(&self, name: &str) -> Result<&ProductSet, RegistryError> {
        self.sets
            .iter()
            .find(|set| set.name == name)
            .ok_or_else(|| RegistryError::SetNotFound {
                name: name.to_owned(),
            })
    }
}

/// A named, validated list of seed products.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductSet {
    name: String,
    products: Vec<ProductSeed>,
}

impl ProductSet {
    /// Returns the set name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the products in file order.
    #[must_use]
    pub fn products(&self) -> &[ProductSeed] {
        &self.products
    }
}

/// One seed product as written in the registry.
///
/// Prices stay textual so the consumer can parse them into its own decimal
/// type; validation guarantees they fit a two-place positive decimal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSeed {
    /// Display name.
    pub name: String,
    /// Manufacturer part number, unique within a set.
    pub part_number: String,
    /// Free-text description.
    #[serde(default)]
    pub description: String,
    /// Category tag such as `engine` or `brakes`.
    pub category: String,
    /// Decimal price, for example `"489.99"`.
    pub price: String,
    /// Units in stock.
    pub stock: u32,
    /// Optional product image.
    #[serde(default)]
    pub image_url: Option<String>,
    /// Compatible motorcycle models.
    #[serde(default)]
    pub compatible_models: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawRegistry {
    version: u32,
    sets: Vec<RawProductSet>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawProductSet {
    name: String,
    products: Vec<ProductSeed>,
}
