//! Rule-based verdict text.
//!
//! The narrative is two sentence groups joined by a space: a switch verdict
//! (is the proposal worth more than what the user has now?) and a market
//! position (how does the CLT salary compare with the market average?).
//! Each is picked by a pure classifier so the bands can be tested apart
//! from the wording.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculations::{ContractorValuation, EmploymentValuation};
use crate::{MarketRate, Perspective, format_currency};

/// Monthly difference beyond which a switch is no longer "equivalent".
pub const SWITCH_BAND: Decimal = Decimal::from_parts(200, 0, 0, false, 0);

/// Percent gap beyond which a salary is no longer "in line" with the market.
pub const MARKET_BAND_PERCENT: Decimal = Decimal::from_parts(5, 0, 0, false, 0);

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

const NO_MARKET_DATA: &str = "No market average is available for your CLT context.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SwitchVerdict {
    Advantageous,
    Disadvantageous,
    Equivalent,
}

impl SwitchVerdict {
    /// `difference` is proposal minus current.
    pub fn classify(difference: Decimal) -> Self {
        if difference > SWITCH_BAND {
            Self::Advantageous
        } else if difference < -SWITCH_BAND {
            Self::Disadvantageous
        } else {
            Self::Equivalent
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarketPosition {
    Above,
    Aligned,
    Below,
    Unavailable,
}

impl MarketPosition {
    pub fn classify(gap_percent: Option<Decimal>) -> Self {
        match gap_percent {
            None => Self::Unavailable,
            Some(gap) if gap > MARKET_BAND_PERCENT => Self::Above,
            Some(gap) if gap < -MARKET_BAND_PERCENT => Self::Below,
            Some(_) => Self::Aligned,
        }
    }
}

/// Proposal value minus current value, signed from the user's side.
pub fn switch_difference(
    employment: &EmploymentValuation,
    contractor: &ContractorValuation,
    perspective: Perspective,
) -> Decimal {
    let pj_minus_clt = contractor.net_value_with_provisioning - employment.equivalent_value;
    match perspective {
        Perspective::Employment => pj_minus_clt,
        Perspective::Contractor => -pj_minus_clt,
    }
}

/// Signed percent of `gross_salary` over the employment average.
///
/// `None` without a positive average or salary.
pub fn market_gap_percent(gross_salary: Decimal, market_rate: Option<&MarketRate>) -> Option<Decimal> {
    let average = market_rate
        .map(|rate| rate.employment_average)
        .filter(|avg| *avg > Decimal::ZERO)?;

    if gross_salary <= Decimal::ZERO {
        return None;
    }

    Some((gross_salary - average) / average * HUNDRED)
}

/// Builds the verdict paragraph.
pub fn narrate(
    employment: &EmploymentValuation,
    contractor: &ContractorValuation,
    perspective: Perspective,
    market_rate: Option<&MarketRate>,
) -> String {
    let difference = switch_difference(employment, contractor, perspective);
    let verdict = SwitchVerdict::classify(difference);

    let gap = market_gap_percent(employment.gross_salary, market_rate);
    let position = MarketPosition::classify(gap);

    let switch_clause = switch_sentence(perspective, verdict, difference);
    let market_clause = match (market_rate, gap) {
        (Some(rate), Some(gap)) => {
            let strong_current_package = perspective == Perspective::Employment
                && verdict == SwitchVerdict::Disadvantageous
                && position == MarketPosition::Above;
            market_sentence(position, rate.employment_average, gap, strong_current_package)
        }
        _ => NO_MARKET_DATA.to_string(),
    };

    format!("{switch_clause} {market_clause}")
}

fn switch_sentence(perspective: Perspective, verdict: SwitchVerdict, difference: Decimal) -> String {
    let amount = format_currency(difference.abs());

    match (perspective, verdict) {
        (Perspective::Employment, SwitchVerdict::Advantageous) => format!(
            "Even after provisioning for benefits, the PJ proposal is worth {amount} more per month. \
             Financially, the switch pays off."
        ),
        (Perspective::Employment, SwitchVerdict::Disadvantageous) => format!(
            "Warning: the PJ proposal's net value (with provisioning) is {amount} below your current CLT value. \
             In practice you would be accepting a pay cut."
        ),
        (Perspective::Employment, SwitchVerdict::Equivalent) => {
            "The switch is financially equivalent. \
             The provisioned PJ net value is very close to your current CLT value."
                .to_string()
        }
        (Perspective::Contractor, SwitchVerdict::Advantageous) => format!(
            "The CLT proposal is advantageous, offering {amount} more in total value \
             than your current PJ net (with provisioning)."
        ),
        (Perspective::Contractor, SwitchVerdict::Disadvantageous) => format!(
            "Warning: the CLT proposal's total value is {amount} below your current PJ net (with provisioning). \
             Financially, it does not look like a good move."
        ),
        (Perspective::Contractor, SwitchVerdict::Equivalent) => {
            "The CLT proposal is financially equivalent to your PJ net (with provisioning). \
             The decision comes down to non-financial factors."
                .to_string()
        }
    }
}

fn market_sentence(
    position: MarketPosition,
    average: Decimal,
    gap: Decimal,
    strong_current_package: bool,
) -> String {
    let average = format_currency(average);
    let percent = gap
        .abs()
        .round_dp_with_strategy(0, rust_decimal::RoundingStrategy::MidpointAwayFromZero);

    match position {
        MarketPosition::Above if strong_current_package => format!(
            "The market average for a similar CLT role is {average}, and your CLT salary is already \
             {percent}% ABOVE it. Your current package is strong, so a PJ proposal would need a \
             substantial increase to be worth the move."
        ),
        MarketPosition::Above => format!(
            "The market average for a similar CLT role is {average}. \
             Your CLT salary is {percent}% ABOVE the average."
        ),
        MarketPosition::Below => format!(
            "The market average for a similar CLT role is {average}. \
             Your CLT salary is {percent}% BELOW the average."
        ),
        MarketPosition::Aligned => format!(
            "The market average for a similar CLT role is {average}. \
             Your CLT salary is in line with the average ({percent}% apart)."
        ),
        MarketPosition::Unavailable => NO_MARKET_DATA.to_string(),
    }
}
