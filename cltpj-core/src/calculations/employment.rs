//! Salaried (CLT) monthly valuation.
//!
//! Turns a gross monthly salary into the monthly value the employee actually
//! receives, including the statutory provisions the employer pays on top.
//!
//! | Component | Rule |
//! |-----------|------|
//! | INSS | cumulative schedule on gross |
//! | IRRF | marginal schedule on gross − INSS |
//! | 13th salary | net salary / 12 |
//! | vacation | (gross × 4/3 − its own INSS − its own IRRF) / 12 |
//! | FGTS | gross × 8% |
//! | benefits | added as-is, already net |
//!
//! The 13th-salary line reuses the monthly net as a proxy instead of
//! withholding a separate 13th paycheck.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use cltpj_core::TaxTables;
//! use cltpj_core::calculations::EmploymentEngine;
//!
//! let tables = TaxTables::default();
//! let valuation = EmploymentEngine::new(&tables)
//!     .valuate(dec!(8000.00), dec!(0))
//!     .unwrap();
//!
//! assert_eq!(valuation.inss_discount, dec!(908.85));
//! assert_eq!(valuation.irrf_discount, dec!(898.75));
//! assert_eq!(valuation.net_salary, dec!(6192.40));
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::TaxTables;
use crate::calculations::common::{monthly_share, round_half_up};
use crate::calculations::progressive::ProgressiveTaxError;

/// Vacation pay is one month's salary plus the constitutional one-third bonus.
const VACATION_FACTOR_NUMERATOR: Decimal = Decimal::from_parts(4, 0, 0, false, 0);
const VACATION_FACTOR_DENOMINATOR: Decimal = Decimal::from_parts(3, 0, 0, false, 0);

/// Monthly-normalized value of a CLT arrangement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmploymentValuation {
    pub gross_salary: Decimal,
    pub extra_benefits: Decimal,
    pub inss_discount: Decimal,
    pub irrf_discount: Decimal,
    /// Gross minus both discounts.
    pub net_salary: Decimal,
    pub thirteenth_monthly: Decimal,
    /// Net vacation pay (salary + 1/3) spread over twelve months.
    pub vacation_monthly: Decimal,
    /// Employer FGTS deposit; not withheld from the employee.
    pub fgts_monthly: Decimal,
    /// 13th + vacation + FGTS.
    pub total_provisions_monthly: Decimal,
    pub equivalent_value: Decimal,
}

/// Calculator for salaried arrangements.
#[derive(Debug, Clone, Copy)]
pub struct EmploymentEngine<'a> {
    tables: &'a TaxTables,
}

impl<'a> EmploymentEngine<'a> {
    pub fn new(tables: &'a TaxTables) -> Self {
        Self { tables }
    }

    /// Values a monthly gross salary plus already-net extra benefits.
    ///
    /// # Errors
    ///
    /// Propagates [`ProgressiveTaxError`] for an empty schedule or a negative
    /// salary; callers validate inputs first.
    pub fn valuate(
        &self,
        gross_salary: Decimal,
        extra_benefits: Decimal,
    ) -> Result<EmploymentValuation, ProgressiveTaxError> {
        let (inss_discount, irrf_discount, net_salary) = self.withhold(gross_salary)?;

        let thirteenth_monthly = monthly_share(net_salary);
        let vacation_monthly = self.vacation_monthly(gross_salary)?;
        let fgts_monthly = round_half_up(gross_salary * self.tables.fgts_rate);
        let total_provisions_monthly = thirteenth_monthly + vacation_monthly + fgts_monthly;
        let equivalent_value = net_salary + total_provisions_monthly + extra_benefits;

        debug!(
            %gross_salary,
            %net_salary,
            %equivalent_value,
            "employment valuation complete"
        );

        Ok(EmploymentValuation {
            gross_salary,
            extra_benefits,
            inss_discount,
            irrf_discount,
            net_salary,
            thirteenth_monthly,
            vacation_monthly,
            fgts_monthly,
            total_provisions_monthly,
            equivalent_value,
        })
    }

    /// Returns `(inss, irrf, net)` for one paycheck.
    fn withhold(&self, gross: Decimal) -> Result<(Decimal, Decimal, Decimal), ProgressiveTaxError> {
        let inss = self.tables.inss.contribution(gross)?;
        let irrf = self.tables.irrf.withholding(gross - inss)?;
        Ok((inss, irrf, gross - inss - irrf))
    }

    /// Net vacation pay withheld on its own larger base, then spread monthly.
    fn vacation_monthly(&self, gross: Decimal) -> Result<Decimal, ProgressiveTaxError> {
        let vacation_gross =
            round_half_up(gross * VACATION_FACTOR_NUMERATOR / VACATION_FACTOR_DENOMINATOR);
        let (_, _, vacation_net) = self.withhold(vacation_gross)?;
        Ok(monthly_share(vacation_net))
    }
}
