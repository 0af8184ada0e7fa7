//! Progressive-bracket withholding.
//!
//! Two evaluation modes share one bracket type:
//!
//! | Mode | Used for | Rule |
//! |------|----------|------|
//! | [`BracketMode::Cumulative`] | INSS | slice the base across brackets, sum each slice × rate, flat ceiling past the top bound |
//! | [`BracketMode::Marginal`] | IRRF | subtract the simplified deduction, then `base × rate − deduction` of the single matching bracket |
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use cltpj_core::InssSchedule;
//! use cltpj_core::calculations::progressive::{BracketMode, evaluate};
//!
//! let inss = InssSchedule::default();
//! let mode = BracketMode::Cumulative { ceiling: inss.ceiling };
//!
//! assert_eq!(evaluate(dec!(1412.00), &inss.brackets, mode).unwrap(), dec!(105.90));
//! assert_eq!(evaluate(dec!(8000.00), &inss.brackets, mode).unwrap(), dec!(908.85));
//! ```

use rust_decimal::Decimal;
use thiserror::Error;

use crate::calculations::common::{floor_at_zero, round_half_up};
use crate::{InssSchedule, IrrfSchedule, TaxBracket};

/// Errors that can occur while walking a bracket schedule.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProgressiveTaxError {
    /// No brackets were provided.
    #[error("no tax brackets provided")]
    NoTaxBrackets,

    /// The base is negative.
    #[error("taxable base must be non-negative, got {0}")]
    NegativeBase(Decimal),
}

/// How a schedule turns a base into a withholding amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BracketMode {
    /// Sum slices; once the base passes the top finite bound return `ceiling`.
    Cumulative { ceiling: Decimal },
    /// Marginal rate with per-bracket deduction, after `simplified_deduction`.
    Marginal { simplified_deduction: Decimal },
}

/// Evaluates `base` against `brackets`, rounded to cents.
///
/// # Errors
///
/// Returns [`ProgressiveTaxError`] if the schedule is empty or the base is
/// negative.
pub fn evaluate(
    base: Decimal,
    brackets: &[TaxBracket],
    mode: BracketMode,
) -> Result<Decimal, ProgressiveTaxError> {
    if brackets.is_empty() {
        return Err(ProgressiveTaxError::NoTaxBrackets);
    }
    if base < Decimal::ZERO {
        return Err(ProgressiveTaxError::NegativeBase(base));
    }

    let amount = match mode {
        BracketMode::Cumulative { ceiling } => cumulative(base, brackets, ceiling),
        BracketMode::Marginal {
            simplified_deduction,
        } => marginal(base, brackets, simplified_deduction),
    };

    Ok(round_half_up(amount))
}

fn cumulative(base: Decimal, brackets: &[TaxBracket], ceiling: Decimal) -> Decimal {
    let mut previous_upper = Decimal::ZERO;
    let mut total = Decimal::ZERO;

    for bracket in brackets {
        match bracket.upper_bound {
            Some(upper) if upper < base => {
                total += (upper - previous_upper) * bracket.rate;
                previous_upper = upper;
            }
            _ => return total + (base - previous_upper) * bracket.rate,
        }
    }

    // Base is above every finite bound.
    ceiling
}

fn marginal(base: Decimal, brackets: &[TaxBracket], simplified_deduction: Decimal) -> Decimal {
    let adjusted = base - simplified_deduction;

    if brackets[0].covers(adjusted) {
        return Decimal::ZERO;
    }

    brackets
        .iter()
        .find(|b| b.covers(adjusted))
        .or_else(|| brackets.last())
        .map(|b| floor_at_zero(adjusted * b.rate - b.deduction))
        .unwrap_or(Decimal::ZERO)
}

impl InssSchedule {
    /// Monthly INSS contribution on `base`.
    pub fn contribution(&self, base: Decimal) -> Result<Decimal, ProgressiveTaxError> {
        evaluate(
            base,
            &self.brackets,
            BracketMode::Cumulative {
                ceiling: self.ceiling,
            },
        )
    }
}

impl IrrfSchedule {
    /// Monthly income tax withheld on `base` (already net of INSS).
    pub fn withholding(&self, base: Decimal) -> Result<Decimal, ProgressiveTaxError> {
        evaluate(
            base,
            &self.brackets,
            BracketMode::Marginal {
                simplified_deduction: self.simplified_deduction,
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn inss() -> InssSchedule {
        InssSchedule::default()
    }

    fn irrf() -> IrrfSchedule {
        IrrfSchedule::default()
    }

    // =========================================================================
    // argument checks
    // =========================================================================

    #[test]
    fn empty_schedule_is_an_error() {
        let result = evaluate(
            dec!(1000),
            &[],
            BracketMode::Cumulative {
                ceiling: dec!(908.85),
            },
        );

        assert_eq!(result, Err(ProgressiveTaxError::NoTaxBrackets));
    }

    #[test]
    fn negative_base_is_an_error() {
        let result = inss().contribution(dec!(-1));

        assert_eq!(result, Err(ProgressiveTaxError::NegativeBase(dec!(-1))));
    }

    // =========================================================================
    // cumulative (INSS) tests
    // =========================================================================

    #[test]
    fn inss_zero_base_is_zero() {
        assert_eq!(inss().contribution(dec!(0)).unwrap(), dec!(0));
    }

    #[test]
    fn inss_inside_first_bracket() {
        // 1000 × 7.5%
        assert_eq!(inss().contribution(dec!(1000.00)).unwrap(), dec!(75.00));
    }

    #[test]
    fn inss_at_first_edge_has_no_double_counting() {
        // 1412 × 7.5%
        assert_eq!(inss().contribution(dec!(1412.00)).unwrap(), dec!(105.90));
    }

    #[test]
    fn inss_at_second_edge_sums_both_brackets() {
        // 105.90 + (2666.68 − 1412) × 9% = 105.90 + 112.9212
        assert_eq!(inss().contribution(dec!(2666.68)).unwrap(), dec!(218.82));
    }

    #[test]
    fn inss_in_third_bracket() {
        // 105.90 + 112.9212 + (3000 − 2666.68) × 12% = 258.8196
        assert_eq!(inss().contribution(dec!(3000.00)).unwrap(), dec!(258.82));
    }

    #[test]
    fn inss_at_top_edge_is_the_full_walk() {
        // 105.90 + 112.9212 + 160.002 + 530.0386
        assert_eq!(inss().contribution(dec!(7786.02)).unwrap(), dec!(908.86));
    }

    #[test]
    fn inss_above_top_edge_is_the_ceiling() {
        assert_eq!(inss().contribution(dec!(7786.03)).unwrap(), dec!(908.85));
        assert_eq!(inss().contribution(dec!(8000.00)).unwrap(), dec!(908.85));
        assert_eq!(inss().contribution(dec!(50000.00)).unwrap(), dec!(908.85));
    }

    #[test]
    fn cumulative_with_open_top_bracket_keeps_accumulating() {
        let brackets = vec![
            TaxBracket::capped(dec!(1000), dec!(0.10), dec!(0)),
            TaxBracket::open(dec!(0.20), dec!(0)),
        ];

        let result = evaluate(
            dec!(3000),
            &brackets,
            BracketMode::Cumulative { ceiling: dec!(1) },
        )
        .unwrap();

        assert_eq!(result, dec!(500.00));
    }

    // =========================================================================
    // marginal (IRRF) tests
    // =========================================================================

    #[test]
    fn irrf_exempt_at_threshold_after_simplified_deduction() {
        // 2824.00 − 564.80 = 2259.20
        assert_eq!(irrf().withholding(dec!(2824.00)).unwrap(), dec!(0));
    }

    #[test]
    fn irrf_exempt_below_simplified_deduction() {
        assert_eq!(irrf().withholding(dec!(300.00)).unwrap(), dec!(0));
    }

    #[test]
    fn irrf_just_above_exemption_uses_second_bracket() {
        // (2900 − 564.80) × 7.5% − 169.44 = 5.70
        assert_eq!(irrf().withholding(dec!(2900.00)).unwrap(), dec!(5.70));
    }

    #[test]
    fn irrf_fourth_bracket() {
        // (4984 − 564.80) × 22.5% − 662.77 = 331.55
        assert_eq!(irrf().withholding(dec!(4984.00)).unwrap(), dec!(331.55));
    }

    #[test]
    fn irrf_top_bracket() {
        // (7091.15 − 564.80) × 27.5% − 896 = 898.74625
        assert_eq!(irrf().withholding(dec!(7091.15)).unwrap(), dec!(898.75));
    }

    #[test]
    fn irrf_is_never_negative() {
        let brackets = vec![
            TaxBracket::capped(dec!(100), dec!(0), dec!(0)),
            TaxBracket::open(dec!(0.10), dec!(500)),
        ];

        let result = evaluate(
            dec!(200),
            &brackets,
            BracketMode::Marginal {
                simplified_deduction: dec!(0),
            },
        )
        .unwrap();

        assert_eq!(result, dec!(0));
    }

    #[test]
    fn marginal_without_open_bracket_falls_back_to_last() {
        let brackets = vec![
            TaxBracket::capped(dec!(100), dec!(0), dec!(0)),
            TaxBracket::capped(dec!(200), dec!(0.10), dec!(10)),
        ];

        let result = evaluate(
            dec!(1000),
            &brackets,
            BracketMode::Marginal {
                simplified_deduction: dec!(0),
            },
        )
        .unwrap();

        assert_eq!(result, dec!(90.00));
    }
}
