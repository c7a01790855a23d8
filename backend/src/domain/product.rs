//! Catalogue products.

use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Largest price representable by the `NUMERIC(10, 2)` column.
const PRICE_MAX: Decimal = Decimal::from_parts(99_999_999, 0, 0, false, 0);
/// Prices carry at most cents.
const PRICE_SCALE: u32 = 2;

/// Product identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(Uuid);

impl ProductId {
    /// Wrap an existing UUID.
    #[must_use]
    pub const fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Generate a fresh identifier.
    #[must_use]
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl std::str::FromStr for ProductId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// A part listed in the catalogue.
///
/// `price` serialises as a decimal string (for example `"489.99"`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub part_number: String,
    pub description: String,
    pub category: String,
    pub price: Decimal,
    pub stock: u32,
    pub image_url: Option<String>,
    pub compatible_models: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl Product {
    /// Whether at least one unit can be added to a cart.
    #[must_use]
    pub const fn is_available(&self) -> bool {
        self.stock > 0
    }
}

/// Validation errors returned by [`NewProduct::validate`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProductValidationError {
    /// A required text field was blank.
    #[error("{field} must not be empty")]
    EmptyField {
        /// Name of the offending field.
        field: &'static str,
    },
    /// The price was zero, negative, or too large.
    #[error("price must be greater than zero and below {max}")]
    PriceOutOfRange {
        /// Upper bound accepted by storage.
        max: Decimal,
    },
    /// The price carried fractions of a cent.
    #[error("price must have at most {scale} decimal places")]
    PriceScale {
        /// Maximum number of fractional digits.
        scale: u32,
    },
}

/// Data for creating a product through the seed/admin collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProduct {
    pub name: String,
    pub part_number: String,
    pub description: String,
    pub category: String,
    pub price: Decimal,
    pub stock: u32,
    pub image_url: Option<String>,
    pub compatible_models: Vec<String>,
}

impl NewProduct {
    /// Check the invariants storage relies on.
    ///
    /// # Examples
    /// ```
    /// use rust_decimal::Decimal;
    /// use storefront::domain::NewProduct;
    ///
    /// let product = NewProduct {
    ///     name: "MT-09 Filtro Olio Originale".into(),
    ///     part_number: "5GH-13440-70".into(),
    ///     description: "Filtro olio".into(),
    ///     category: "engine".into(),
    ///     price: Decimal::new(1850, 2),
    ///     stock: 45,
    ///     image_url: None,
    ///     compatible_models: vec!["MT-09 2014-2023".into()],
    /// };
    /// assert!(product.validate().is_ok());
    /// ```
    pub fn validate(&self) -> Result<(), ProductValidationError> {
        for (field, value) in [
            ("name", &self.name),
            ("partNumber", &self.part_number),
            ("category", &self.category),
        ] {
            if value.trim().is_empty() {
                return Err(ProductValidationError::EmptyField { field });
            }
        }
        if self.price <= Decimal::ZERO || self.price > PRICE_MAX {
            return Err(ProductValidationError::PriceOutOfRange { max: PRICE_MAX });
        }
        if self.price.normalize().scale() > PRICE_SCALE {
            return Err(ProductValidationError::PriceScale { scale: PRICE_SCALE });
        }
        Ok(())
    }
}
