use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One row of a withholding schedule.
///
/// `upper_bound` of `None` is the open top bracket. `deduction` is only read
/// by marginal (IRRF-style) schedules and stays zero for INSS.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBracket {
    #[serde(default)]
    pub upper_bound: Option<Decimal>,
    pub rate: Decimal,
    #[serde(default)]
    pub deduction: Decimal,
}

impl TaxBracket {
    pub fn capped(upper_bound: Decimal, rate: Decimal, deduction: Decimal) -> Self {
        Self {
            upper_bound: Some(upper_bound),
            rate,
            deduction,
        }
    }

    pub fn open(rate: Decimal, deduction: Decimal) -> Self {
        Self {
            upper_bound: None,
            rate,
            deduction,
        }
    }

    /// True when `amount` falls at or below this bracket's upper bound.
    pub fn covers(&self, amount: Decimal) -> bool {
        self.upper_bound.is_none_or(|upper| amount <= upper)
    }
}
