use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Categorical key for reference-data lookups.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MarketContext {
    pub area: String,
    pub seniority: String,
    pub location: String,
}

impl MarketContext {
    pub fn new(
        area: impl Into<String>,
        seniority: impl Into<String>,
        location: impl Into<String>,
    ) -> Self {
        Self {
            area: area.into(),
            seniority: seniority.into(),
            location: location.into(),
        }
    }
}

/// Most recent observed monthly averages for one context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketRate {
    pub employment_average: Decimal,
    pub contractor_average: Decimal,
}

impl MarketRate {
    pub fn for_kind(&self, kind: SeriesKind) -> Decimal {
        match kind {
            SeriesKind::Employment => self.employment_average,
            SeriesKind::Contractor => self.contractor_average,
        }
    }
}

/// Which of the two averages a historical series tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SeriesKind {
    Employment,
    Contractor,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoricalPoint {
    pub period_label: String,
    pub value: Decimal,
}

/// Monthly observations, oldest first, at most twelve.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoricalSeries {
    pub kind: SeriesKind,
    pub points: Vec<HistoricalPoint>,
    pub next_period_label: String,
}

impl HistoricalSeries {
    pub const MAX_POINTS: usize = 12;

    pub fn values(&self) -> Vec<Decimal> {
        self.points.iter().map(|p| p.value).collect()
    }
}

/// Selectable values for the categorical inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    pub areas: Vec<String>,
    pub seniorities: Vec<String>,
    pub locations: Vec<String>,
}
