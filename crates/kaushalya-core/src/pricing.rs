use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::money::Money;

/// Percentage off the real price, rounded half up to a whole number.
///
/// A zero real price yields 0 instead of dividing by zero. A discount price
/// above the real price yields a negative value; callers are expected to keep
/// `discount <= real`.
#[must_use]
pub fn discount_percent(real: Money, discount: Money) -> i64 {
    let real = real.amount();
    if real.is_zero() {
        return 0;
    }

    let percent = real
        .checked_sub(discount.amount())
        .and_then(|saved| saved.checked_div(real))
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED));

    // floor(x + 0.5): halves round up for both signs.
    percent
        .and_then(|p| p.checked_add(Decimal::new(5, 1)))
        .map(|p| p.floor())
        .and_then(|p| p.to_i64())
        .unwrap_or(0)
}

/// `Rs 1100.00`
#[must_use]
pub fn format_rupees(amount: Money) -> String {
    format!("Rs {amount}")
}

/// `42% OFF`
#[must_use]
pub fn discount_label(real: Money, discount: Money) -> String {
    format!("{}% OFF", discount_percent(real, discount))
}
