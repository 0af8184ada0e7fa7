//! Least-squares trend over a monthly rate series.
//!
//! Fits `value = intercept + slope × index` over indices `0..n`, projects one
//! step past the last observation, and labels the slope:
//!
//! | Slope (per month) | Status |
//! |-------------------|--------|
//! | > 75 | Strong Up |
//! | > 25 | Moderate Up |
//! | > 0 and ≤ 25 | Stable/Slight Up |
//! | 0 | Flat |
//! | > −25 and < 0 | Stable/Slight Down |
//! | < −75 | Strong Down |
//! | otherwise | Moderate Down |

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculations::common::decimal_to_f64;

const STRONG_THRESHOLD: f64 = 75.0;
const MODERATE_THRESHOLD: f64 = 25.0;

/// Display hint for a trend status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Success,
    Info,
    Neutral,
    Warning,
    Danger,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Info => "info",
            Self::Neutral => "neutral",
            Self::Warning => "warning",
            Self::Danger => "danger",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrendStatus {
    StrongUp,
    ModerateUp,
    StableSlightUp,
    Flat,
    StableSlightDown,
    ModerateDown,
    StrongDown,
}

impl TrendStatus {
    pub fn classify(slope: f64) -> Self {
        if slope > STRONG_THRESHOLD {
            Self::StrongUp
        } else if slope > MODERATE_THRESHOLD {
            Self::ModerateUp
        } else if slope > -MODERATE_THRESHOLD {
            if slope > 0.0 {
                Self::StableSlightUp
            } else if slope < 0.0 {
                Self::StableSlightDown
            } else {
                Self::Flat
            }
        } else if slope < -STRONG_THRESHOLD {
            Self::StrongDown
        } else {
            Self::ModerateDown
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::StrongUp => "Strong Up",
            Self::ModerateUp => "Moderate Up",
            Self::StableSlightUp => "Stable/Slight Up",
            Self::Flat => "Flat",
            Self::StableSlightDown => "Stable/Slight Down",
            Self::ModerateDown => "Moderate Down",
            Self::StrongDown => "Strong Down",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::StrongUp => "Market rates are climbing fast; expect offers to keep rising.",
            Self::ModerateUp => "Market rates are rising steadily.",
            Self::StableSlightUp => "Market rates are stable with a slight upward drift.",
            Self::Flat => "Market rates have not moved over the period.",
            Self::StableSlightDown => "Market rates are stable with a slight downward drift.",
            Self::ModerateDown => "Market rates are cooling off.",
            Self::StrongDown => "Market rates are falling fast; negotiate with care.",
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            Self::StrongUp => Severity::Success,
            Self::ModerateUp => Severity::Info,
            Self::StableSlightUp | Self::Flat | Self::StableSlightDown => Severity::Neutral,
            Self::ModerateDown => Severity::Warning,
            Self::StrongDown => Severity::Danger,
        }
    }

    /// Any of the three labels inside the ±25 band.
    pub fn is_stable(&self) -> bool {
        matches!(
            self,
            Self::StableSlightUp | Self::Flat | Self::StableSlightDown
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPrediction {
    pub slope: f64,
    pub intercept: f64,
    /// Fitted value one period after the last observation.
    pub forecast_value: f64,
    pub status: TrendStatus,
    pub status_label: String,
    pub description: String,
    pub severity: Severity,
}

/// Fits and classifies `series`; `None` with fewer than two points.
///
/// ```
/// use rust_decimal_macros::dec;
/// use cltpj_core::calculations::trend::{TrendStatus, forecast};
///
/// let prediction = forecast(&[dec!(5000), dec!(5100), dec!(5200)]).unwrap();
///
/// assert!((prediction.slope - 100.0).abs() < 1e-9);
/// assert!((prediction.forecast_value - 5300.0).abs() < 1e-9);
/// assert_eq!(prediction.status, TrendStatus::StrongUp);
/// ```
pub fn forecast(series: &[Decimal]) -> Option<TrendPrediction> {
    if series.len() < 2 {
        return None;
    }

    let values: Vec<f64> = series.iter().copied().map(decimal_to_f64).collect();
    let n = values.len() as f64;
    let mean_x = (n - 1.0) / 2.0;
    let mean_y = values.iter().sum::<f64>() / n;

    let (covariance, variance) =
        values
            .iter()
            .enumerate()
            .fold((0.0, 0.0), |(cov, var), (i, y)| {
                let dx = i as f64 - mean_x;
                (cov + dx * (y - mean_y), var + dx * dx)
            });

    let slope = covariance / variance;
    let intercept = mean_y - slope * mean_x;
    let forecast_value = intercept + slope * n;
    let status = TrendStatus::classify(slope);

    Some(TrendPrediction {
        slope,
        intercept,
        forecast_value,
        status,
        status_label: status.label().to_string(),
        description: status.description().to_string(),
        severity: status.severity(),
    })
}
