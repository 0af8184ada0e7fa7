use rust_decimal::Decimal;

use crate::calculations::common::round_half_up;

/// Formats money the Brazilian way: `R$ 1.234,56`.
///
/// Rounds half-up to cents; negatives get a leading `-`.
///
/// ```
/// use rust_decimal_macros::dec;
/// use cltpj_core::format_currency;
///
/// assert_eq!(format_currency(dec!(1234.565)), "R$ 1.234,57");
/// assert_eq!(format_currency(dec!(-72)), "-R$ 72,00");
/// ```
pub fn format_currency(value: Decimal) -> String {
    let rounded = round_half_up(value);
    let sign = if rounded < Decimal::ZERO { "-" } else { "" };

    let mut magnitude = rounded.abs();
    magnitude.rescale(2);
    let text = magnitude.to_string();
    let (integer, cents) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    format!("{sign}R$ {},{cents}", group_thousands(integer))
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);

    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push('.');
        }
        out.push(ch);
    }

    out
}
