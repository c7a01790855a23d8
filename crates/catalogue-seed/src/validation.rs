//! Field rules for seed products.
//!
//! Prices mirror the backend's `NUMERIC(10, 2)` column with a positive
//! check: ASCII digits, an optional point and at most two fractional digits.

use std::collections::HashSet;

use crate::error::RegistryError;
use crate::registry::ProductSeed;

/// Maximum number of digits after the decimal point in a price.
pub const PRICE_MAX_FRACTION_DIGITS: usize = 2;

/// Maximum number of digits before the decimal point in a price.
const PRICE_MAX_INTEGER_DIGITS: usize = 8;

/// Returns `true` when `raw` is a positive decimal price.
///
/// # Examples
///
/// ```
/// use catalogue_seed::is_valid_price;
///
/// assert!(is_valid_price("489.99"));
/// assert!(is_valid_price("18.5"));
/// assert!(is_valid_price("7"));
/// assert!(!is_valid_price("0.00"));
/// assert!(!is_valid_price("18.505"));
/// assert!(!is_valid_price("-4.00"));
/// ```
#[must_use]
pub fn is_valid_price(raw: &str) -> bool {
    let (whole, fraction) = raw.split_once('.').unwrap_or((raw, ""));
    if whole.is_empty() || whole.len() > PRICE_MAX_INTEGER_DIGITS {
        return false;
    }
    if raw.contains('.') && fraction.is_empty() {
        return false;
    }
    if fraction.len() > PRICE_MAX_FRACTION_DIGITS {
        return false;
    }
    let digits = whole.chars().chain(fraction.chars());
    let mut any_non_zero = false;
    for c in digits {
        if !c.is_ascii_digit() {
            return false;
        }
        any_non_zero |= c != '0';
    }
    any_non_zero
}

/// Checks every product in a set and rejects repeated part numbers.
pub(crate) fn validate_set(set: &str, products: &[ProductSeed]) -> Result<(), RegistryError> {
    if products.is_empty() {
        return Err(RegistryError::EmptyProducts {
            set: set.to_owned(),
        });
    }

    let mut seen = HashSet::new();
    for (index, product) in products.iter().enumerate() {
        validate_product(set, index, product)?;
        if !seen.insert(product.part_number.as_str()) {
            return Err(RegistryError::DuplicatePartNumber {
                set: set.to_owned(),
                part_number: product.part_number.clone(),
            });
        }
    }
    Ok(())
}

fn validate_product(set: &str, index: usize, product: &ProductSeed) -> Result<(), RegistryError> {
    let required = [
        ("name", product.name.as_str()),
        ("partNumber", product.part_number.as_str()),
        ("category", product.category.as_str()),
    ];
    if let Some((field, _)) = required.iter().find(|(_, value)| value.trim().is_empty()) {
        return Err(RegistryError::BlankField {
            set: set.to_owned(),
            index,
            field: *field,
        });
    }
    if !is_valid_price(&product.price) {
        return Err(RegistryError::InvalidPrice {
            set: set.to_owned(),
            part_number: product.part_number.clone(),
            value: product.price.clone(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn product(part_number: &str, price: &str) -> ProductSeed {
        ProductSeed {
            name: "Catena Trasmissione DID 525 Racing".to_owned(),
            part_number: part_number.to_owned(),
            description: String::new(),
            category: "transmission".to_owned(),
            price: price.to_owned(),
            stock: 22,
            image_url: None,
            compatible_models: Vec::new(),
        }
    }

    #[rstest]
    #[case("189.00", true)]
    #[case("0.01", true)]
    #[case("99999999.99", true)]
    #[case("12.3", true)]
    #[case("0", false)]
    #[case("", false)]
    #[case(".50", false)]
    #[case("12.", false)]
    #[case("1.234", false)]
    #[case("1,50", false)]
    #[case("1e3", false)]
    #[case("123456789.00", false)]
    fn prices_follow_the_column_shape(#[case] raw: &str, #[case] expected: bool) {
        assert_eq!(is_valid_price(raw), expected);
    }

    #[test]
    fn empty_sets_are_rejected() {
        assert_eq!(
            validate_set("demo", &[]),
            Err(RegistryError::EmptyProducts {
                set: "demo".to_owned()
            })
        );
    }

    #[test]
    fn blank_part_numbers_are_rejected() {
        let products = [product("5VY-25158-00", "189.00"), product("  ", "10.00")];
        assert_eq!(
            validate_set("demo", &products),
            Err(RegistryError::BlankField {
                set: "demo".to_owned(),
                index: 1,
                field: "partNumber",
            })
        );
    }

    #[test]
    fn repeated_part_numbers_are_rejected() {
        let products = [
            product("5VY-25158-00", "189.00"),
            product("5VY-25158-00", "190.00"),
        ];
        assert_eq!(
            validate_set("demo", &products),
            Err(RegistryError::DuplicatePartNumber {
                set: "demo".to_owned(),
                part_number: "5VY-25158-00".to_owned(),
            })
        );
    }

    #[test]
    fn bad_prices_name_the_product() {
        let products = [product("5VY-25158-00", "0.00")];
        assert!(matches!(
            validate_set("demo", &products),
            Err(RegistryError::InvalidPrice { part_number, .. }) if part_number == "5VY-25158-00"
        ));
    }
}
