//! Cart line items.
//!
//! A cart is the set of items a user owns; there is at most one item per
//! `(user, product)` pair and its quantity is always at least one.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Product, ProductId, UserId};

/// Cart item identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CartItemId(Uuid);

impl CartItemId {
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

impl fmt::Display for CartItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl std::str::FromStr for CartItemId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Validation errors returned by [`Quantity::new`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QuantityValidationError {
    /// Quantities start at one.
    #[error("quantity must be at least 1, got {value}")]
    NotPositive {
        /// Rejected value.
        value: i64,
    },
    /// Quantities must fit the storage column.
    #[error("quantity must be at most {max}, got {value}")]
    TooLarge {
        /// Rejected value.
        value: i64,
        /// Largest accepted value.
        max: i64,
    },
}

/// Positive item count.
///
/// ## Invariants
/// - `1 <= value <= i32::MAX`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(into = "u32")]
pub struct Quantity(u32);

impl Quantity {
    /// Largest quantity the storage column accepts.
    pub const MAX: i64 = i32::MAX as i64;

    /// Validate a raw count.
    ///
    /// # Examples
    /// ```
    /// use storefront::domain::Quantity;
    ///
    /// assert_eq!(Quantity::new(3).map(Quantity::get), Ok(3));
    /// assert!(Quantity::new(0).is_err());
    /// ```
    pub fn new(value: i64) -> Result<Self, QuantityValidationError> {
        if value < 1 {
            return Err(QuantityValidationError::NotPositive { value });
        }
        u32::try_from(value)
            .ok()
            .filter(|_| value <= Self::MAX)
            .map(Self)
            .ok_or(QuantityValidationError::TooLarge {
                value,
                max: Self::MAX,
            })
    }

    /// A single unit.
    #[must_use]
    pub const fn one() -> Self {
        Self(1)
    }

    /// Return the count.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl From<Quantity> for u32 {
    fn from(value: Quantity) -> Self {
        value.0
    }
}

/// A product line in a user's cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub id: CartItemId,
    pub user_id: UserId,
    pub product_id: ProductId,
    pub quantity: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CartItem {
    /// Whether the item belongs to `user_id`.
    #[must_use]
    pub fn is_owned_by(&self, user_id: &UserId) -> bool {
        &self.user_id == user_id
    }
}

/// Cart item joined with its product, as listed by `GET /api/cart`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItemWithProduct {
    #[serde(flatten)]
    pub item: CartItem,
    pub product: Product,
}
