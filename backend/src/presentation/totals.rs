//! Cart arithmetic, stock badges and price formatting.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::domain::{CartItemWithProduct, Product};

/// Subtotals strictly above this ship free.
pub const FREE_SHIPPING_THRESHOLD: Decimal = Decimal::from_parts(10_000, 0, 0, false, 2);
/// Flat shipping fee below the threshold.
pub const SHIPPING_FEE: Decimal = Decimal::from_parts(999, 0, 0, false, 2);
/// Stock above this shows as plainly available.
pub const LOW_STOCK_LIMIT: u32 = 10;

/// Order summary for a cart. No tax is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CartTotals {
    /// Sum of price times quantity.
    pub subtotal: Decimal,
    /// Zero above the free-shipping threshold, otherwise the flat fee.
    pub shipping: Decimal,
    /// Subtotal plus shipping.
    pub total: Decimal,
    /// Amount still needed for free shipping while below the threshold.
    pub remaining_for_free_shipping: Option<Decimal>,
}

/// Price of one cart line.
#[must_use]
pub fn line_total(line: &CartItemWithProduct) -> Decimal {
    line.product.price * Decimal::from(line.item.quantity)
}

/// Compute the summary for `lines`.
///
/// # Examples
/// ```
/// use rust_decimal::Decimal;
/// use storefront::presentation::totals::cart_totals;
///
/// let totals = cart_totals(&[]);
/// assert_eq!(totals.subtotal, Decimal::ZERO);
/// assert_eq!(totals.total, Decimal::new(999, 2));
/// ```
#[must_use]
pub fn cart_totals(lines: &[CartItemWithProduct]) -> CartTotals {
    let subtotal: Decimal = lines.iter().map(line_total).sum();
    let shipping = if subtotal > FREE_SHIPPING_THRESHOLD {
        Decimal::ZERO
    } else {
        SHIPPING_FEE
    };
    let remaining_for_free_shipping =
        (subtotal < FREE_SHIPPING_THRESHOLD).then(|| FREE_SHIPPING_THRESHOLD - subtotal);
    CartTotals {
        subtotal,
        shipping,
        total: subtotal + shipping,
        remaining_for_free_shipping,
    }
}

/// Number shown on the navbar cart badge: the sum of quantities.
#[must_use]
pub fn cart_count(lines: &[CartItemWithProduct]) -> u64 {
    lines.iter().map(|line| u64::from(line.item.quantity)).sum()
}

/// Availability badge for a product card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockBadge {
    /// More than [`LOW_STOCK_LIMIT`] units.
    InStock,
    /// Between one and [`LOW_STOCK_LIMIT`] units.
    LowStock(u32),
    /// Nothing left; adding to the cart is disabled.
    SoldOut,
}

impl StockBadge {
    /// Badge for `stock` units.
    #[must_use]
    pub const fn for_stock(stock: u32) -> Self {
        match stock {
            0 => Self::SoldOut,
            n if n > LOW_STOCK_LIMIT => Self::InStock,
            n => Self::LowStock(n),
        }
    }

    /// Badge for `product`.
    #[must_use]
    pub const fn for_product(product: &Product) -> Self {
        Self::for_stock(product.stock)
    }

    /// Badge text.
    #[must_use]
    pub fn label(self) -> String {
        match self {
            Self::InStock => "In Stock".to_owned(),
            Self::LowStock(n) => format!("Solo {n} rimasti"),
            Self::SoldOut => "Esaurito".to_owned(),
        }
    }

    /// Whether the add-to-cart button is enabled.
    #[must_use]
    pub const fn can_add_to_cart(self) -> bool {
        !matches!(self, Self::SoldOut)
    }
}

/// Enabled state of a cart line's quantity stepper.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepperBounds {
    /// Disabled at one; removal is a separate action.
    pub can_decrement: bool,
    /// Disabled once the quantity reaches the product's stock.
    pub can_increment: bool,
}

impl StepperBounds {
    /// Bounds for a line holding `quantity` of a product with `stock` units.
    #[must_use]
    pub const fn new(quantity: u32, stock: u32) -> Self {
        Self {
            can_decrement: quantity > 1,
            can_increment: quantity < stock,
        }
    }
}

/// Format `amount` the way the Italian storefront shows euro prices.
///
/// Two decimals, `.` thousands separator, `,` decimal separator and a
/// trailing euro sign.
///
/// # Examples
/// ```
/// use rust_decimal::Decimal;
/// use storefront::presentation::totals::format_price;
///
/// assert_eq!(format_price(Decimal::new(123_456, 2)), "1.234,56 €");
/// assert_eq!(format_price(Decimal::new(999, 2)), "9,99 €");
/// ```
#[must_use]
pub fn format_price(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    let cents = rounded.abs().mantissa() * 10_i128.pow(2 - rounded.scale().min(2));
    let whole = (cents / 100).to_string();
    let fraction = cents % 100;

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (index, digit) in whole.chars().enumerate() {
        if index > 0 && (whole.len() - index) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(digit);
    }
    format!("{sign}{grouped},{fraction:02} €")
}
