//! Untyped form input and its validated counterpart.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::{MarketContext, Perspective};

/// Upper bound for any monthly amount: one billion.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(1_000_000_000, 0, 0, false, 0);

#[derive(Debug, Error)]
enum AmountError {
    #[error("',' must separate groups of three digits before the decimal point")]
    Grouping,

    #[error(transparent)]
    Decimal(#[from] rust_decimal::Error),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{0} is required")]
    MissingContext(&'static str),

    #[error("{field} is not a valid amount: '{input}'")]
    InvalidAmount { field: &'static str, input: String },

    #[error("{field} must be greater than zero, got {value}")]
    NonPositiveAmount { field: &'static str, value: Decimal },

    #[error("{field} must not be negative, got {value}")]
    NegativeAmount { field: &'static str, value: Decimal },

    #[error("{field} must not exceed {max}, got {value}", max = MAX_AMOUNT)]
    AmountTooLarge { field: &'static str, value: Decimal },

    #[error("tax rate must be a fraction between 0 and 1 (or a percentage), got '{0}'")]
    InvalidTaxRate(String),

    #[error("unknown perspective '{0}', expected clt or pj")]
    InvalidPerspective(String),
}

/// Evaluation fields exactly as typed by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawEvaluationInput {
    pub gross_salary: String,
    pub extra_benefits: String,
    pub gross_revenue: String,
    pub costs: String,
    /// Fraction (`0.12`) or percentage (`12%`); blank lets the engine pick.
    pub tax_rate: String,
    pub perspective: String,
    pub area: String,
    pub seniority: String,
    pub location: String,
}

/// A checked evaluation ready for [`crate::ComparisonService`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationRequest {
    pub gross_salary: Decimal,
    pub extra_benefits: Decimal,
    pub gross_revenue: Decimal,
    pub costs: Decimal,
    pub tax_rate_override: Option<Decimal>,
    pub perspective: Perspective,
    pub context: MarketContext,
}

impl RawEvaluationInput {
    /// Checks every field; context first, then amounts.
    pub fn validate(&self) -> Result<EvaluationRequest, ValidationError> {
        let context = self.context()?;
        let perspective = parse_perspective(&self.perspective)?;

        let gross_salary = required_amount("gross_salary", &self.gross_salary)?;
        let gross_revenue = required_amount("gross_revenue", &self.gross_revenue)?;
        let extra_benefits = optional_amount("extra_benefits", &self.extra_benefits)?;
        let costs = optional_amount("costs", &self.costs)?;
        let tax_rate_override = parse_tax_rate(&self.tax_rate)?;

        debug!(
            area = %context.area,
            seniority = %context.seniority,
            location = %context.location,
            perspective = perspective.as_str(),
            "evaluation input validated"
        );

        Ok(EvaluationRequest {
            gross_salary,
            extra_benefits,
            gross_revenue,
            costs,
            tax_rate_override,
            perspective,
            context,
        })
    }

    fn context(&self) -> Result<MarketContext, ValidationError> {
        let area = non_blank("area", &self.area)?;
        let seniority = non_blank("seniority", &self.seniority)?;
        let location = non_blank("location", &self.location)?;
        Ok(MarketContext::new(area, seniority, location))
    }
}

fn non_blank<'a>(field: &'static str, value: &'a str) -> Result<&'a str, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(ValidationError::MissingContext(field))
    } else {
        Ok(trimmed)
    }
}

fn parse_perspective(value: &str) -> Result<Perspective, ValidationError> {
    if value.trim().is_empty() {
        return Ok(Perspective::default());
    }
    Perspective::parse(value).ok_or_else(|| ValidationError::InvalidPerspective(value.to_string()))
}

/// Trims whitespace and drops `,` thousands separators. A `,` anywhere
/// else (`300,50`, `8.000,00`) is rejected rather than guessed at.
fn normalize_decimal_input(s: &str) -> Result<String, AmountError> {
    let trimmed = s.trim();
    let integer_part = match trimmed.split_once('.') {
        Some((_, fraction)) if fraction.contains(',') => return Err(AmountError::Grouping),
        Some((integer, _)) => integer,
        None => trimmed,
    };

    let mut groups = integer_part.split(',');
    let lead = groups.next().unwrap_or_default();
    let mut rest = groups.peekable();
    if rest.peek().is_some() {
        let lead_ok = !lead.trim_start_matches('-').is_empty();
        if !lead_ok || !rest.all(|g| g.len() == 3 && g.bytes().all(|b| b.is_ascii_digit())) {
            return Err(AmountError::Grouping);
        }
    }

    Ok(trimmed.replace(',', ""))
}

/// `Ok(None)` for blank input.
fn parse_decimal(s: &str) -> Result<Option<Decimal>, AmountError> {
    let normalized = normalize_decimal_input(s)?;
    if normalized.is_empty() {
        return Ok(None);
    }
    Ok(Some(normalized.parse()?))
}

fn within_max(field: &'static str, value: Decimal) -> Result<Decimal, ValidationError> {
    if value > MAX_AMOUNT {
        return Err(ValidationError::AmountTooLarge { field, value });
    }
    Ok(value)
}

fn required_amount(field: &'static str, input: &str) -> Result<Decimal, ValidationError> {
    let value = parse_decimal(input)
        .map_err(|_| ValidationError::InvalidAmount {
            field,
            input: input.to_string(),
        })?
        .unwrap_or(Decimal::ZERO);

    if value <= Decimal::ZERO {
        return Err(ValidationError::NonPositiveAmount { field, value });
    }
    within_max(field, value)
}

/// Text that is not a number at all counts as zero; a number with
/// ambiguous grouping is an error.
fn optional_amount(field: &'static str, input: &str) -> Result<Decimal, ValidationError> {
    let value = match parse_decimal(input) {
        Ok(value) => value.unwrap_or(Decimal::ZERO),
        Err(AmountError::Grouping) => {
            return Err(ValidationError::InvalidAmount {
                field,
                input: input.to_string(),
            });
        }
        Err(e) => {
            warn!(field, input, "invalid optional amount, using zero: {}", e);
            Decimal::ZERO
        }
    };

    if value < Decimal::ZERO {
        return Err(ValidationError::NegativeAmount { field, value });
    }
    within_max(field, value)
}

fn parse_tax_rate(input: &str) -> Result<Option<Decimal>, ValidationError> {
    let invalid = || ValidationError::InvalidTaxRate(input.to_string());

    let trimmed = input.trim();
    let (number, is_percent) = match trimmed.strip_suffix('%') {
        Some(number) => (number, true),
        None => (trimmed, false),
    };

    let Some(value) = parse_decimal(number).map_err(|_| invalid())? else {
        return Ok(None);
    };
    let rate = if is_percent {
        value / Decimal::ONE_HUNDRED
    } else {
        value
    };

    if rate < Decimal::ZERO || rate > Decimal::ONE {
        return Err(invalid());
    }
    Ok(Some(rate))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn input() -> RawEvaluationInput {
        RawEvaluationInput {
            gross_salary: "8000".into(),
            extra_benefits: "".into(),
            gross_revenue: "20,000.00".into(),
            costs: "".into(),
            tax_rate: "".into(),
            perspective: "".into(),
            area: "Desenvolvimento de Software".into(),
            seniority: "Pleno".into(),
            location: "São Paulo - SP".into(),
        }
    }

    // =========================================================================
    // happy path
    // =========================================================================

    #[test]
    fn validate_fills_defaults() {
        let request = input().validate().unwrap();

        assert_eq!(
            request,
            EvaluationRequest {
                gross_salary: dec!(8000),
                extra_benefits: dec!(0),
                gross_revenue: dec!(20000.00),
                costs: dec!(0),
                tax_rate_override: None,
                perspective: Perspective::Employment,
                context: MarketContext::new(
                    "Desenvolvimento de Software",
                    "Pleno",
                    "São Paulo - SP"
                ),
            }
        );
    }

    #[test]
    fn context_values_are_trimmed() {
        let raw = RawEvaluationInput {
            area: "  Marketing Digital ".into(),
            ..input()
        };

        assert_eq!(raw.validate().unwrap().context.area, "Marketing Digital");
    }

    #[test]
    fn perspective_accepts_both_spellings() {
        for (text, expected) in [
            ("pj", Perspective::Contractor),
            ("Contractor", Perspective::Contractor),
            ("CLT", Perspective::Employment),
            (" employment ", Perspective::Employment),
        ] {
            let raw = RawEvaluationInput {
                perspective: text.into(),
                ..input()
            };
            assert_eq!(raw.validate().unwrap().perspective, expected, "{text}");
        }
    }

    #[test]
    fn tax_rate_accepts_fraction_or_percent() {
        let fraction = RawEvaluationInput {
            tax_rate: "0.12".into(),
            ..input()
        };
        let percent = RawEvaluationInput {
            tax_rate: "15.5%".into(),
            ..input()
        };

        assert_eq!(fraction.validate().unwrap().tax_rate_override, Some(dec!(0.12)));
        assert_eq!(percent.validate().unwrap().tax_rate_override, Some(dec!(0.155)));
    }

    #[test]
    fn unparseable_optional_amount_becomes_zero() {
        let raw = RawEvaluationInput {
            extra_benefits: "lots".into(),
            costs: " 1,250.50 ".into(),
            ..input()
        };

        let request = raw.validate().unwrap();
        assert_eq!(request.extra_benefits, dec!(0));
        assert_eq!(request.costs, dec!(1250.50));
    }

    // =========================================================================
    // failures
    // =========================================================================

    #[test]
    fn missing_context_is_reported_before_amounts() {
        let raw = RawEvaluationInput {
            seniority: "   ".into(),
            gross_salary: "abc".into(),
            ..input()
        };

        assert_eq!(raw.validate(), Err(ValidationError::MissingContext("seniority")));
    }

    #[test]
    fn non_numeric_salary_is_invalid() {
        let raw = RawEvaluationInput {
            gross_salary: "eight thousand".into(),
            ..input()
        };

        assert_eq!(
            raw.validate(),
            Err(ValidationError::InvalidAmount {
                field: "gross_salary",
                input: "eight thousand".into(),
            })
        );
    }

    #[test]
    fn blank_or_zero_revenue_is_non_positive() {
        for text in ["", "0", "-10"] {
            let raw = RawEvaluationInput {
                gross_revenue: text.into(),
                ..input()
            };
            assert!(
                matches!(
                    raw.validate(),
                    Err(ValidationError::NonPositiveAmount {
                        field: "gross_revenue",
                        ..
                    })
                ),
                "{text}"
            );
        }
    }

    #[test]
    fn negative_costs_are_rejected() {
        let raw = RawEvaluationInput {
            costs: "-300".into(),
            ..input()
        };

        assert_eq!(
            raw.validate(),
            Err(ValidationError::NegativeAmount {
                field: "costs",
                value: dec!(-300),
            })
        );
    }

    #[test]
    fn tax_rate_out_of_range_is_rejected() {
        for text in ["1.5", "-0.1", "120%", "abc"] {
            let raw = RawEvaluationInput {
                tax_rate: text.into(),
                ..input()
            };
            assert_eq!(
                raw.validate(),
                Err(ValidationError::InvalidTaxRate(text.to_string())),
                "{text}"
            );
        }
    }

    #[test]
    fn brazilian_decimal_comma_is_rejected() {
        let salary = RawEvaluationInput {
            gross_salary: "8.000,00".into(),
            ..input()
        };
        let costs = RawEvaluationInput {
            costs: "300,50".into(),
            ..input()
        };

        assert_eq!(
            salary.validate(),
            Err(ValidationError::InvalidAmount {
                field: "gross_salary",
                input: "8.000,00".into(),
            })
        );
        assert_eq!(
            costs.validate(),
            Err(ValidationError::InvalidAmount {
                field: "costs",
                input: "300,50".into(),
            })
        );
    }

    #[test]
    fn malformed_thousands_groups_are_rejected() {
        for text in ["1,00", "12,3456", ",500", "1,,000", "1,000.5,0"] {
            let raw = RawEvaluationInput {
                gross_revenue: text.into(),
                ..input()
            };
            assert!(
                matches!(
                    raw.validate(),
                    Err(ValidationError::InvalidAmount {
                        field: "gross_revenue",
                        ..
                    })
                ),
                "{text}"
            );
        }
    }

    #[test]
    fn thousands_groups_are_accepted() {
        let raw = RawEvaluationInput {
            gross_salary: "1,234,567.89".into(),
            costs: "-1,200".into(),
            ..input()
        };

        assert_eq!(
            RawEvaluationInput {
                costs: "".into(),
                ..raw.clone()
            }
            .validate()
            .unwrap()
            .gross_salary,
            dec!(1234567.89)
        );
        assert_eq!(
            raw.validate(),
            Err(ValidationError::NegativeAmount {
                field: "costs",
                value: dec!(-1200),
            })
        );
    }

    #[test]
    fn amounts_above_the_ceiling_are_rejected() {
        let huge = RawEvaluationInput {
            gross_salary: "30000000000000000000000000000".into(),
            ..input()
        };
        let huge_costs = RawEvaluationInput {
            costs: "1,000,000,000.01".into(),
            ..input()
        };
        let at_ceiling = RawEvaluationInput {
            gross_salary: "1000000000".into(),
            ..input()
        };

        assert_eq!(
            huge.validate(),
            Err(ValidationError::AmountTooLarge {
                field: "gross_salary",
                value: dec!(30000000000000000000000000000),
            })
        );
        assert!(matches!(
            huge_costs.validate(),
            Err(ValidationError::AmountTooLarge { field: "costs", .. })
        ));
        assert_eq!(at_ceiling.validate().unwrap().gross_salary, MAX_AMOUNT);
    }

    #[test]
    fn unknown_perspective_is_rejected() {
        let raw = RawEvaluationInput {
            perspective: "freelancer".into(),
            ..input()
        };

        assert_eq!(
            raw.validate(),
            Err(ValidationError::InvalidPerspective("freelancer".into()))
        );
    }
}
