//! Menu pricing and cart totals. All amounts are integer cents.

use crate::entities::{OrderLine, menu_item_entity as menu_items};
use crate::error::{AppError, AppResult};

/// Sales tax applied to every cart, in percent.
pub const TAX_RATE_PERCENT: i64 = 7;

/// Highest menu price accepted, in cents ($100,000).
pub const MAX_PRICE_CENTS: i64 = 10_000_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CartTotals {
    pub subtotal: i64,
    pub tax: i64,
    pub total: i64,
}

/// `numerator / denominator` rounded half away from zero. `denominator` must
/// be positive.
pub(crate) fn div_round(numerator: i64, denominator: i64) -> i64 {
    let quotient = numerator / denominator;
    let remainder = numerator % denominator;
    if remainder.abs() * 2 >= denominator {
        quotient + numerator.signum()
    } else {
        quotient
    }
}

/// Effective unit price of a menu item.
///
/// An explicit happy-hour price wins while happy hour is active. Items without
/// one fall back to `fallback_percent` when configured, otherwise the base
/// price applies.
pub fn resolve_unit_price(
    item: &menu_items::Model,
    happy_hour_active: bool,
    fallback_percent: Option<u32>,
) -> i64 {
    if !happy_hour_active {
        return item.price;
    }
    match (item.happy_hour_price, fallback_percent) {
        (Some(price), _) => price,
        (None, Some(percent)) => apply_discount(item.price, percent),
        (None, None) => item.price,
    }
}

/// Price reduced by `percent`, rounded to the cent.
///
/// Whole dollars and the cent remainder are scaled separately, so no
/// intermediate product exceeds `price`.
pub fn apply_discount(price: i64, percent: u32) -> i64 {
    let keep = 100 - i64::from(percent.min(100));
    (price / 100) * keep + div_round((price % 100) * keep, 100)
}

pub(crate) fn amount_overflow() -> AppError {
    AppError::ValidationError("Order amount is too large".to_string())
}

pub fn compute_tax(subtotal: i64) -> AppResult<i64> {
    let scaled = subtotal
        .checked_mul(TAX_RATE_PERCENT)
        .ok_or_else(amount_overflow)?;
    Ok(div_round(scaled, 100))
}

/// Subtotal is the exact sum of line subtotals; only the tax is rounded.
pub fn compute_cart_totals<'a, I>(lines: I) -> AppResult<CartTotals>
where
    I: IntoIterator<Item = &'a OrderLine>,
{
    let mut subtotal: i64 = 0;
    for line in lines {
        let amount = line
            .price
            .checked_mul(i64::from(line.quantity))
            .ok_or_else(amount_overflow)?;
        subtotal = subtotal.checked_add(amount).ok_or_else(amount_overflow)?;
    }
    let tax = compute_tax(subtotal)?;
    let total = subtotal.checked_add(tax).ok_or_else(amount_overflow)?;
    Ok(CartTotals {
        subtotal,
        tax,
        total,
    })
}
