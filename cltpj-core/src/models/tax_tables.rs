use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::TaxBracket;

/// Social-security (INSS) schedule: cumulative walk with a legal ceiling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InssSchedule {
    pub brackets: Vec<TaxBracket>,
    /// Contribution charged once the base passes the top finite bound.
    pub ceiling: Decimal,
}

impl Default for InssSchedule {
    fn default() -> Self {
        Self {
            brackets: vec![
                TaxBracket::capped(Decimal::new(141200, 2), Decimal::new(75, 3), Decimal::ZERO),
                TaxBracket::capped(Decimal::new(266668, 2), Decimal::new(9, 2), Decimal::ZERO),
                TaxBracket::capped(Decimal::new(400003, 2), Decimal::new(12, 2), Decimal::ZERO),
                TaxBracket::capped(Decimal::new(778602, 2), Decimal::new(14, 2), Decimal::ZERO),
            ],
            ceiling: Decimal::new(90885, 2),
        }
    }
}

/// Withheld income tax (IRRF) schedule: marginal rate minus a per-bracket
/// deduction, after the simplified monthly deduction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IrrfSchedule {
    pub brackets: Vec<TaxBracket>,
    pub simplified_deduction: Decimal,
}

impl Default for IrrfSchedule {
    fn default() -> Self {
        Self {
            brackets: vec![
                TaxBracket::capped(Decimal::new(225920, 2), Decimal::ZERO, Decimal::ZERO),
                TaxBracket::capped(
                    Decimal::new(282665, 2),
                    Decimal::new(75, 3),
                    Decimal::new(16944, 2),
                ),
                TaxBracket::capped(
                    Decimal::new(375105, 2),
                    Decimal::new(15, 2),
                    Decimal::new(38144, 2),
                ),
                TaxBracket::capped(
                    Decimal::new(466468, 2),
                    Decimal::new(225, 3),
                    Decimal::new(66277, 2),
                ),
                TaxBracket::open(Decimal::new(275, 3), Decimal::new(89600, 2)),
            ],
            simplified_deduction: Decimal::new(56480, 2),
        }
    }
}

/// Payroll tables applied to a salaried (CLT) arrangement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaxTables {
    pub inss: InssSchedule,
    pub irrf: IrrfSchedule,
    /// Employer FGTS deposit as a fraction of gross salary.
    pub fgts_rate: Decimal,
}

impl Default for TaxTables {
    fn default() -> Self {
        Self {
            inss: InssSchedule::default(),
            irrf: IrrfSchedule::default(),
            fgts_rate: Decimal::new(8, 2),
        }
    }
}
