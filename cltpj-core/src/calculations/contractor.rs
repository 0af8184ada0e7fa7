//! Contractor (PJ) monthly valuation and tax-regime optimization.
//!
//! # Regime selection
//!
//! Checked in order:
//!
//! 1. **MEI** when revenue is at or below the monthly MEI limit: a fixed DAS,
//!    no pro-labore.
//! 2. **Rate override** when the caller supplies a rate: `revenue × rate`
//!    plus INSS on a minimum-wage pro-labore.
//! 3. **Simples Nacional**, best of two sub-regimes:
//!
//! | Sub-regime | Pro-labore | INSS | IRRF | Levy |
//! |------------|------------|------|------|------|
//! | Anexo V | minimum wage | 11% | exempt | 15.5% of revenue |
//! | Anexo III (Fator R) | 28% of revenue | 11% | IRRF schedule | 6% of revenue |
//!
//! Anexo III is chosen only when its net is strictly higher; ties stay on
//! Anexo V.
//!
//! Every regime then sets aside one twelfth of the net for a 13th month and
//! another for vacation.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use cltpj_core::{ContractorRules, IrrfSchedule};
//! use cltpj_core::calculations::{ContractorEngine, Regime, TaxStrategy};
//!
//! let rules = ContractorRules::default();
//! let irrf = IrrfSchedule::default();
//! let engine = ContractorEngine::new(&rules, &irrf);
//!
//! let mei = engine.valuate(dec!(5000.00), dec!(0), None).unwrap();
//! assert_eq!(mei.regime, Regime::Mei);
//! assert_eq!(mei.tax_amount, dec!(72.00));
//!
//! let simples = engine.valuate(dec!(20000.00), dec!(0), None).unwrap();
//! assert_eq!(simples.strategy, TaxStrategy::AnexoIiiFatorR);
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::calculations::common::{floor_at_zero, monthly_share, round_half_up};
use crate::calculations::progressive::ProgressiveTaxError;
use crate::{ContractorRules, IrrfSchedule};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Regime {
    #[serde(rename = "MEI")]
    Mei,
    SimplesNacional,
}

impl Regime {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mei => "MEI",
            Self::SimplesNacional => "Simples Nacional",
        }
    }
}

/// The concrete billing structure behind a [`Regime`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaxStrategy {
    MeiFixedLevy,
    RateOverride,
    AnexoV,
    AnexoIiiFatorR,
}

impl TaxStrategy {
    pub fn regime(&self) -> Regime {
        match self {
            Self::MeiFixedLevy => Regime::Mei,
            Self::RateOverride | Self::AnexoV | Self::AnexoIiiFatorR => Regime::SimplesNacional,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::MeiFixedLevy => "MEI (fixed monthly DAS)",
            Self::RateOverride => "Simples Nacional (informed rate)",
            Self::AnexoV => "Simples Nacional - Anexo V",
            Self::AnexoIiiFatorR => "Simples Nacional - Anexo III (Fator R)",
        }
    }
}

/// Result of evaluating a single billing structure, before provisioning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegimeOutcome {
    pub strategy: TaxStrategy,
    pub tax_rate: Decimal,
    pub tax_amount: Decimal,
    pub pro_labore: Decimal,
    pub pro_labore_inss: Decimal,
    pub pro_labore_irrf: Decimal,
    pub net_value: Decimal,
}

impl RegimeOutcome {
    /// Everything paid to the government in the month.
    pub fn total_levies(&self) -> Decimal {
        self.tax_amount + self.pro_labore_inss + self.pro_labore_irrf
    }
}

/// Monthly-normalized value of a PJ arrangement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractorValuation {
    pub regime: Regime,
    pub strategy: TaxStrategy,
    pub gross_revenue: Decimal,
    pub costs: Decimal,
    /// Effective rate of `tax_amount` over gross revenue.
    pub tax_rate: Decimal,
    pub tax_amount: Decimal,
    /// Notional salary draw; zero under MEI.
    pub pro_labore: Decimal,
    pub pro_labore_inss: Decimal,
    pub pro_labore_irrf: Decimal,
    pub net_value: Decimal,
    pub thirteenth_provision: Decimal,
    pub vacation_provision: Decimal,
    pub total_provisions: Decimal,
    pub net_value_with_provisioning: Decimal,
}

/// Calculator for contractor arrangements.
#[derive(Debug, Clone, Copy)]
pub struct ContractorEngine<'a> {
    rules: &'a ContractorRules,
    irrf: &'a IrrfSchedule,
}

impl<'a> ContractorEngine<'a> {
    pub fn new(rules: &'a ContractorRules, irrf: &'a IrrfSchedule) -> Self {
        Self { rules, irrf }
    }

    /// Values a monthly revenue, picking the cheapest applicable regime
    /// unless `tax_rate_override` pins the rate.
    ///
    /// # Errors
    ///
    /// Propagates [`ProgressiveTaxError`] from the IRRF schedule.
    pub fn valuate(
        &self,
        gross_revenue: Decimal,
        costs: Decimal,
        tax_rate_override: Option<Decimal>,
    ) -> Result<ContractorValuation, ProgressiveTaxError> {
        let outcome = if gross_revenue <= self.rules.mei_monthly_revenue_limit {
            self.mei(gross_revenue, costs)
        } else if let Some(rate) = tax_rate_override {
            self.rate_override(gross_revenue, costs, rate)
        } else {
            let anexo_v = self.anexo_v(gross_revenue, costs);
            let anexo_iii = self.anexo_iii(gross_revenue, costs)?;
            choose(anexo_v, anexo_iii)
        };

        debug!(
            strategy = outcome.strategy.label(),
            net_value = %outcome.net_value,
            "contractor regime selected"
        );

        Ok(provision(gross_revenue, costs, outcome))
    }

    /// Fixed DAS, no pro-labore.
    pub fn mei(&self, gross_revenue: Decimal, costs: Decimal) -> RegimeOutcome {
        let levy = self.rules.mei_monthly_levy;
        let tax_rate = if gross_revenue > Decimal::ZERO {
            (levy / gross_revenue).round_dp(4)
        } else {
            Decimal::ZERO
        };

        RegimeOutcome {
            strategy: TaxStrategy::MeiFixedLevy,
            tax_rate,
            tax_amount: levy,
            pro_labore: Decimal::ZERO,
            pro_labore_inss: Decimal::ZERO,
            pro_labore_irrf: Decimal::ZERO,
            net_value: gross_revenue - costs - levy,
        }
    }

    /// Caller-supplied rate with a minimum-wage pro-labore.
    pub fn rate_override(&self, gross_revenue: Decimal, costs: Decimal, rate: Decimal) -> RegimeOutcome {
        self.minimum_wage_draw(TaxStrategy::RateOverride, gross_revenue, costs, rate)
    }

    /// Minimum-wage pro-labore, higher Anexo V levy.
    pub fn anexo_v(&self, gross_revenue: Decimal, costs: Decimal) -> RegimeOutcome {
        self.minimum_wage_draw(
            TaxStrategy::AnexoV,
            gross_revenue,
            costs,
            self.rules.anexo_v_rate,
        )
    }

    /// Pro-labore raised to the Fator R ratio to unlock the Anexo III levy.
    ///
    /// # Errors
    ///
    /// Propagates [`ProgressiveTaxError`] from the IRRF schedule.
    pub fn anexo_iii(
        &self,
        gross_revenue: Decimal,
        costs: Decimal,
    ) -> Result<RegimeOutcome, ProgressiveTaxError> {
        let pro_labore = round_half_up(gross_revenue * self.rules.fator_r_ratio);
        let pro_labore_inss = round_half_up(pro_labore * self.rules.pro_labore_inss_rate);
        let pro_labore_irrf = self.irrf.withholding(floor_at_zero(pro_labore - pro_labore_inss))?;

        Ok(self.outcome(
            TaxStrategy::AnexoIiiFatorR,
            gross_revenue,
            costs,
            self.rules.anexo_iii_rate,
            pro_labore,
            pro_labore_inss,
            pro_labore_irrf,
        ))
    }

    // The minimum wage sits in the IRRF exempt band, so no income tax is withheld.
    fn minimum_wage_draw(
        &self,
        strategy: TaxStrategy,
        gross_revenue: Decimal,
        costs: Decimal,
        rate: Decimal,
    ) -> RegimeOutcome {
        let pro_labore = self.rules.minimum_wage;
        let pro_labore_inss = round_half_up(pro_labore * self.rules.pro_labore_inss_rate);

        self.outcome(
            strategy,
            gross_revenue,
            costs,
            rate,
            pro_labore,
            pro_labore_inss,
            Decimal::ZERO,
        )
    }

    #[allow(clippy::too_many_arguments)]
    fn outcome(
        &self,
        strategy: TaxStrategy,
        gross_revenue: Decimal,
        costs: Decimal,
        tax_rate: Decimal,
        pro_labore: Decimal,
        pro_labore_inss: Decimal,
        pro_labore_irrf: Decimal,
    ) -> RegimeOutcome {
        let tax_amount = round_half_up(gross_revenue * tax_rate);
        let net_value = gross_revenue - costs - (tax_amount + pro_labore_inss + pro_labore_irrf);

        RegimeOutcome {
            strategy,
            tax_rate,
            tax_amount,
            pro_labore,
            pro_labore_inss,
            pro_labore_irrf,
            net_value,
        }
    }
}

/// Keeps `anexo_v` unless `anexo_iii` nets strictly more.
pub fn choose(anexo_v: RegimeOutcome, anexo_iii: RegimeOutcome) -> RegimeOutcome {
    if anexo_iii.net_value > anexo_v.net_value {
        anexo_iii
    } else {
        anexo_v
    }
}

/// Applies the voluntary 13th/vacation set-aside to a regime outcome.
fn provision(gross_revenue: Decimal, costs: Decimal, outcome: RegimeOutcome) -> ContractorValuation {
    // A loss-making month sets nothing aside.
    let monthly = monthly_share(floor_at_zero(outcome.net_value));
    let total_provisions = monthly + monthly;

    ContractorValuation {
        regime: outcome.strategy.regime(),
        strategy: outcome.strategy,
        gross_revenue,
        costs,
        tax_rate: outcome.tax_rate,
        tax_amount: outcome.tax_amount,
        pro_labore: outcome.pro_labore,
        pro_labore_inss: outcome.pro_labore_inss,
        pro_labore_irrf: outcome.pro_labore_irrf,
        net_value: outcome.net_value,
        thirteenth_provision: monthly,
        vacation_provision: monthly,
        total_provisions,
        net_value_with_provisioning: outcome.net_value - total_provisions,
    }
}
