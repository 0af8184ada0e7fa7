use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Constants that drive the contractor (PJ) regime selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContractorRules {
    /// Monthly share of the MEI annual revenue cap (81 000 / 12).
    pub mei_monthly_revenue_limit: Decimal,
    /// Fixed monthly DAS paid under MEI.
    pub mei_monthly_levy: Decimal,
    pub minimum_wage: Decimal,
    /// Owner's INSS contribution on the pro-labore draw.
    pub pro_labore_inss_rate: Decimal,
    /// Simples Nacional Anexo V starting rate.
    pub anexo_v_rate: Decimal,
    /// Simples Nacional Anexo III starting rate.
    pub anexo_iii_rate: Decimal,
    /// Payroll-to-revenue ratio required to qualify for Anexo III.
    pub fator_r_ratio: Decimal,
}

impl Default for ContractorRules {
    fn default() -> Self {
        Self {
            mei_monthly_revenue_limit: Decimal::new(675000, 2),
            mei_monthly_levy: Decimal::new(7200, 2),
            minimum_wage: Decimal::new(141200, 2),
            pro_labore_inss_rate: Decimal::new(11, 2),
            anexo_v_rate: Decimal::new(155, 3),
            anexo_iii_rate: Decimal::new(6, 2),
            fator_r_ratio: Decimal::new(28, 2),
        }
    }
}
