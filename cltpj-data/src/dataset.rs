//! In-memory reference dataset.
//!
//! Loaded once at startup and only read afterwards. Rows may be dated
//! (`period` set) or undated snapshots; lookups prefer the newest dated row.

use std::collections::BTreeSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use async_trait::async_trait;
use chrono::{Months, NaiveDate};
use cltpj_core::{
    Catalog, HistoricalPoint, HistoricalSeries, MarketContext, MarketDataProvider, MarketRate,
    ProviderError, SeriesKind,
};
use tracing::{debug, info, warn};

use crate::loader::{MarketDataLoader, MarketDataLoaderError, MarketRateRecord};

/// Seniority levels offered regardless of the dataset.
pub const SENIORITIES: [&str; 3] = ["Júnior", "Pleno", "Sênior"];

/// Offered when no dataset could be loaded.
pub const FALLBACK_AREAS: [&str; 3] = [
    "Desenvolvimento de Software",
    "Design de Produto (UI/UX)",
    "Marketing Digital",
];

/// Offered when no dataset could be loaded.
pub const FALLBACK_LOCATIONS: [&str; 3] = [
    "Rio de Janeiro - RJ",
    "Santa Catarina - SC",
    "São Paulo - SP",
];

/// Label format for history points, e.g. `Jan/2024`.
const PERIOD_LABEL_FORMAT: &str = "%b/%Y";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MarketDataset {
    records: Vec<MarketRateRecord>,
}

impl MarketDataset {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_records(records: Vec<MarketRateRecord>) -> Self {
        Self { records }
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, MarketDataLoaderError> {
        MarketDataLoader::parse(reader).map(Self::from_records)
    }

    pub fn load(path: &Path) -> Result<Self, MarketDataLoaderError> {
        let file = File::open(path).map_err(|source| MarketDataLoaderError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let dataset = Self::from_reader(file)?;

        info!(
            path = %path.display(),
            rows = dataset.len(),
            "market dataset loaded"
        );
        Ok(dataset)
    }

    /// Like [`MarketDataset::load`], but a failure leaves an empty dataset
    /// so evaluations still run without market context.
    pub fn load_or_empty(path: &Path) -> Self {
        Self::load(path).unwrap_or_else(|e| {
            warn!(path = %path.display(), "market dataset unavailable, continuing without it: {}", e);
            Self::empty()
        })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[MarketRateRecord] {
        &self.records
    }

    /// Distinct lookup contexts, sorted.
    pub fn contexts(&self) -> BTreeSet<MarketContext> {
        self.records.iter().map(MarketRateRecord::context).collect()
    }

    /// Earliest and latest dated months.
    pub fn period_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        let mut periods = self.records.iter().filter_map(|r| r.period);
        let first = periods.next()?;
        Some(periods.fold((first, first), |(lo, hi), p| (lo.min(p), hi.max(p))))
    }

    /// Newest dated row for `context`, else its first undated row.
    pub fn latest_rate_for(&self, context: &MarketContext) -> Option<MarketRate> {
        let mut undated = None;
        let mut newest: Option<&MarketRateRecord> = None;

        for record in self.records.iter().filter(|r| r.matches(context)) {
            match (record.period, newest.and_then(|n| n.period)) {
                (Some(period), Some(current)) if period <= current => {}
                (Some(_), _) => newest = Some(record),
                (None, _) => {
                    undated.get_or_insert(record);
                }
            }
        }

        newest.or(undated).map(MarketRateRecord::rate)
    }

    /// The twelve most recent dated rows for `context`, oldest first.
    pub fn history_for(&self, context: &MarketContext, kind: SeriesKind) -> Option<HistoricalSeries> {
        let mut dated: Vec<(NaiveDate, MarketRate)> = self
            .records
            .iter()
            .filter(|r| r.matches(context))
            .filter_map(|r| r.period.map(|p| (p, r.rate())))
            .collect();

        if dated.is_empty() {
            return None;
        }

        dated.sort_by_key(|(period, _)| *period);
        let skip = dated.len().saturating_sub(HistoricalSeries::MAX_POINTS);
        let recent = &dated[skip..];

        let last_period = recent.last().map(|(p, _)| *p)?;
        let next_period_label = last_period
            .checked_add_months(Months::new(1))
            .map(|p| p.format(PERIOD_LABEL_FORMAT).to_string())
            .unwrap_or_default();

        let points = recent
            .iter()
            .map(|(period, rate)| HistoricalPoint {
                period_label: period.format(PERIOD_LABEL_FORMAT).to_string(),
                value: rate.for_kind(kind),
            })
            .collect();

        Some(HistoricalSeries {
            kind,
            points,
            next_period_label,
        })
    }

    /// Sorted areas and locations present in the data, or the fallback
    /// lists when the dataset is empty.
    pub fn catalog_entries(&self) -> Catalog {
        let seniorities = SENIORITIES.iter().map(|s| s.to_string()).collect();

        if self.is_empty() {
            return Catalog {
                areas: FALLBACK_AREAS.iter().map(|s| s.to_string()).collect(),
                seniorities,
                locations: FALLBACK_LOCATIONS.iter().map(|s| s.to_string()).collect(),
            };
        }

        let areas: BTreeSet<&str> = self.records.iter().map(|r| r.area.as_str()).collect();
        let locations: BTreeSet<&str> = self.records.iter().map(|r| r.location.as_str()).collect();

        Catalog {
            areas: areas.into_iter().map(str::to_string).collect(),
            seniorities,
            locations: locations.into_iter().map(str::to_string).collect(),
        }
    }
}

#[async_trait]
impl MarketDataProvider for MarketDataset {
    async fn latest_rate(
        &self,
        context: &MarketContext,
    ) -> Result<Option<MarketRate>, ProviderError> {
        let rate = self.latest_rate_for(context);
        debug!(?context, found = rate.is_some(), "market rate lookup");
        Ok(rate)
    }

    async fn history(
        &self,
        context: &MarketContext,
        kind: SeriesKind,
    ) -> Result<Option<HistoricalSeries>, ProviderError> {
        Ok(self.history_for(context, kind))
    }

    async fn catalog(&self) -> Result<Catalog, ProviderError> {
        Ok(self.catalog_entries())
    }
}
