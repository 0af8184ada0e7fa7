//! Process-wide calculation parameters.
//!
//! An [`EngineConfig`] is built once at startup (compiled-in defaults,
//! optionally overridden from a TOML file by the front end), validated, and
//! then lent by reference to every valuation.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{ContractorRules, TaxBracket, TaxTables};

/// Errors raised when a configuration cannot be used for calculations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A withholding schedule has no brackets.
    #[error("{0} schedule has no brackets")]
    EmptySchedule(&'static str),

    /// Bracket upper bounds are not strictly ascending, or the open bracket is not last.
    #[error("{schedule} bracket {index} is out of order")]
    UnorderedBrackets {
        schedule: &'static str,
        index: usize,
    },

    /// A rate or ratio falls outside [0, 1].
    #[error("{field} must be between 0 and 1, got {value}")]
    RateOutOfRange { field: &'static str, value: Decimal },

    /// An amount that must be positive is zero or negative.
    #[error("{field} must be positive, got {value}")]
    NonPositiveAmount { field: &'static str, value: Decimal },

    /// An amount that must be non-negative is negative.
    #[error("{field} must be non-negative, got {value}")]
    NegativeAmount { field: &'static str, value: Decimal },
}

/// Everything the valuation engines need besides the per-request inputs.
///
/// # Example
///
/// ```
/// use cltpj_core::EngineConfig;
/// use rust_decimal_macros::dec;
///
/// let config = EngineConfig::default();
///
/// assert!(config.validate().is_ok());
/// assert_eq!(config.tax_tables.inss.ceiling, dec!(908.85));
/// assert_eq!(config.contractor.mei_monthly_levy, dec!(72.00));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub tax_tables: TaxTables,
    pub contractor: ContractorRules,
}

impl EngineConfig {
    /// Checks every table and constant.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let tables = &self.tax_tables;
        validate_brackets("INSS", &tables.inss.brackets)?;
        validate_brackets("IRRF", &tables.irrf.brackets)?;
        positive("inss.ceiling", tables.inss.ceiling)?;
        non_negative("irrf.simplified_deduction", tables.irrf.simplified_deduction)?;
        fraction("fgts_rate", tables.fgts_rate)?;

        let rules = &self.contractor;
        positive("mei_monthly_revenue_limit", rules.mei_monthly_revenue_limit)?;
        non_negative("mei_monthly_levy", rules.mei_monthly_levy)?;
        positive("minimum_wage", rules.minimum_wage)?;
        fraction("pro_labore_inss_rate", rules.pro_labore_inss_rate)?;
        fraction("anexo_v_rate", rules.anexo_v_rate)?;
        fraction("anexo_iii_rate", rules.anexo_iii_rate)?;
        fraction("fator_r_ratio", rules.fator_r_ratio)?;
        Ok(())
    }
}

fn validate_brackets(schedule: &'static str, brackets: &[TaxBracket]) -> Result<(), ConfigError> {
    if brackets.is_empty() {
        return Err(ConfigError::EmptySchedule(schedule));
    }

    let mut previous = Decimal::ZERO;
    for (index, bracket) in brackets.iter().enumerate() {
        fraction("bracket rate", bracket.rate)?;
        non_negative("bracket deduction", bracket.deduction)?;
        match bracket.upper_bound {
            Some(upper) if upper > previous => previous = upper,
            None if index == brackets.len() - 1 => {}
            _ => return Err(ConfigError::UnorderedBrackets { schedule, index }),
        }
    }
    Ok(())
}

fn fraction(field: &'static str, value: Decimal) -> Result<(), ConfigError> {
    if value < Decimal::ZERO || value > Decimal::ONE {
        return Err(ConfigError::RateOutOfRange { field, value });
    }
    Ok(())
}

fn positive(field: &'static str, value: Decimal) -> Result<(), ConfigError> {
    if value <= Decimal::ZERO {
        return Err(ConfigError::NonPositiveAmount { field, value });
    }
    Ok(())
}

fn non_negative(field: &'static str, value: Decimal) -> Result<(), ConfigError> {
    if value < Decimal::ZERO {
        return Err(ConfigError::NegativeAmount { field, value });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert_eq!(EngineConfig::default().validate(), Ok(()));
    }

    #[test]
    fn empty_inss_schedule_is_rejected() {
        let mut config = EngineConfig::default();
        config.tax_tables.inss.brackets.clear();

        assert_eq!(config.validate(), Err(ConfigError::EmptySchedule("INSS")));
    }

    #[test]
    fn descending_bounds_are_rejected() {
        let mut config = EngineConfig::default();
        config.tax_tables.irrf.brackets.swap(1, 2);

        assert_eq!(
            config.validate(),
            Err(ConfigError::UnorderedBrackets {
                schedule: "IRRF",
                index: 2,
            })
        );
    }

    #[test]
    fn open_bracket_must_be_last() {
        let mut config = EngineConfig::default();
        config
            .tax_tables
            .inss
            .brackets
            .insert(0, TaxBracket::open(dec!(0.05), dec!(0)));

        assert_eq!(
            config.validate(),
            Err(ConfigError::UnorderedBrackets {
                schedule: "INSS",
                index: 0,
            })
        );
    }

    #[test]
    fn rate_above_one_is_rejected() {
        let mut config = EngineConfig::default();
        config.contractor.anexo_v_rate = dec!(1.5);

        assert_eq!(
            config.validate(),
            Err(ConfigError::RateOutOfRange {
                field: "anexo_v_rate",
                value: dec!(1.5),
            })
        );
    }

    #[test]
    fn zero_minimum_wage_is_rejected() {
        let mut config = EngineConfig::default();
        config.contractor.minimum_wage = dec!(0);

        assert_eq!(
            config.validate(),
            Err(ConfigError::NonPositiveAmount {
                field: "minimum_wage",
                value: dec!(0),
            })
        );
    }

    #[test]
    fn negative_levy_is_rejected() {
        let mut config = EngineConfig::default();
        config.contractor.mei_monthly_levy = dec!(-1);

        assert_eq!(
            config.validate(),
            Err(ConfigError::NegativeAmount {
                field: "mei_monthly_levy",
                value: dec!(-1),
            })
        );
    }
}
