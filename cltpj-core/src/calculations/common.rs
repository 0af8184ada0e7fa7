//! Shared arithmetic helpers for the valuation engines.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

/// Months in a year; provisions are spread evenly across them.
pub const MONTHS_PER_YEAR: Decimal = Decimal::from_parts(12, 0, 0, false, 0);

/// Rounds a monetary value to cents, half away from zero.
///
/// ```
/// use rust_decimal_macros::dec;
/// use cltpj_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(898.74625)), dec!(898.75));
/// assert_eq!(round_half_up(dec!(-0.005)), dec!(-0.01));
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
}

/// Clamps negative values to zero.
pub fn floor_at_zero(value: Decimal) -> Decimal {
    if value < Decimal::ZERO { Decimal::ZERO } else { value }
}

/// One twelfth of `value`, rounded to cents.
pub fn monthly_share(value: Decimal) -> Decimal {
    round_half_up(value / MONTHS_PER_YEAR)
}

/// Converts money to `f64` for the statistical modules.
pub fn decimal_to_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or(0.0)
}
