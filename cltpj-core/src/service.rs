//! One complete CLT vs PJ evaluation.
//!
//! [`ComparisonService`] runs both valuation engines, asks the market data
//! provider for context, and assembles a [`ComparisonReport`]. Market data is
//! optional throughout: a missing context or a failing provider drops the
//! benchmark, trend, and market clause instead of failing the evaluation.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::calculations::common::round_half_up;
use crate::calculations::{
    ContractorEngine, ContractorValuation, EmploymentEngine, EmploymentValuation,
    GaussianBenchmark, ProgressiveTaxError, TrendPrediction, benchmark, forecast, narrate,
};
use crate::provider::MarketDataProvider;
use crate::request::EvaluationRequest;
use crate::{EngineConfig, HistoricalSeries, MarketContext, MarketRate, SeriesKind};

/// Display width given to the larger bar.
const BAR_FULL_WIDTH: Decimal = Decimal::from_parts(95, 0, 0, false, 0);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EvaluationError {
    #[error("tax calculation failed: {0}")]
    Tax(#[from] ProgressiveTaxError),
}

/// Side-by-side bars for gross salary vs market average.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BenchmarkBar {
    pub proposal_value: Decimal,
    pub market_value: Decimal,
    /// Signed, relative to the market value.
    pub percentage_diff: Decimal,
    pub is_above: bool,
    pub proposal_width: Decimal,
    pub market_width: Decimal,
}

impl BenchmarkBar {
    /// `None` unless the market value is positive.
    pub fn new(proposal_value: Decimal, market_value: Decimal) -> Option<Self> {
        if market_value <= Decimal::ZERO {
            return None;
        }

        let percentage_diff =
            round_half_up((proposal_value - market_value) / market_value * Decimal::ONE_HUNDRED);

        let (proposal_width, market_width) = if proposal_value > market_value {
            (
                BAR_FULL_WIDTH,
                round_half_up(market_value / proposal_value * BAR_FULL_WIDTH),
            )
        } else {
            (
                round_half_up(proposal_value / market_value * BAR_FULL_WIDTH),
                BAR_FULL_WIDTH,
            )
        };

        Some(Self {
            proposal_value,
            market_value,
            percentage_diff,
            is_above: percentage_diff >= Decimal::ZERO,
            proposal_width,
            market_width,
        })
    }
}

/// Historical rates for the user's work mode plus their projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendForecast {
    pub series_kind: SeriesKind,
    pub history: HistoricalSeries,
    /// `None` when fewer than two months are on record.
    pub prediction: Option<TrendPrediction>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonReport {
    pub employment: EmploymentValuation,
    pub contractor: ContractorValuation,
    pub market_rate: Option<MarketRate>,
    pub benchmark: Option<GaussianBenchmark>,
    pub trend: Option<TrendForecast>,
    pub narrative: String,
    pub benchmark_bar: Option<BenchmarkBar>,
    /// PJ net with provisioning minus CLT equivalent value.
    pub difference: Decimal,
}

/// Evaluates requests against fixed tax tables and a market data source.
pub struct ComparisonService<'a, P: MarketDataProvider + ?Sized> {
    config: &'a EngineConfig,
    provider: &'a P,
}

impl<'a, P: MarketDataProvider + ?Sized> ComparisonService<'a, P> {
    pub fn new(config: &'a EngineConfig, provider: &'a P) -> Self {
        Self { config, provider }
    }

    pub async fn evaluate(
        &self,
        request: &EvaluationRequest,
    ) -> Result<ComparisonReport, EvaluationError> {
        let tables = &self.config.tax_tables;

        let employment =
            EmploymentEngine::new(tables).valuate(request.gross_salary, request.extra_benefits)?;
        let contractor = ContractorEngine::new(&self.config.contractor, &tables.irrf).valuate(
            request.gross_revenue,
            request.costs,
            request.tax_rate_override,
        )?;

        let market_rate = self.latest_rate(&request.context).await;
        let employment_average = market_rate.map(|rate| rate.employment_average);

        let benchmark = benchmark(request.gross_salary, employment_average);
        let trend = self
            .trend(&request.context, request.perspective.series_kind())
            .await;
        let narrative = narrate(
            &employment,
            &contractor,
            request.perspective,
            market_rate.as_ref(),
        );
        let benchmark_bar =
            employment_average.and_then(|avg| BenchmarkBar::new(request.gross_salary, avg));
        let difference = contractor.net_value_with_provisioning - employment.equivalent_value;

        debug!(
            %difference,
            has_market_rate = market_rate.is_some(),
            has_trend = trend.is_some(),
            "comparison complete"
        );

        Ok(ComparisonReport {
            employment,
            contractor,
            market_rate,
            benchmark,
            trend,
            narrative,
            benchmark_bar,
            difference,
        })
    }

    async fn latest_rate(&self, context: &MarketContext) -> Option<MarketRate> {
        match self.provider.latest_rate(context).await {
            Ok(rate) => {
                if rate.is_none() {
                    debug!(?context, "no market rate for context");
                }
                rate
            }
            Err(e) => {
                warn!(?context, "market rate lookup failed: {}", e);
                None
            }
        }
    }

    async fn trend(&self, context: &MarketContext, kind: SeriesKind) -> Option<TrendForecast> {
        let history = match self.provider.history(context, kind).await {
            Ok(history) => history?,
            Err(e) => {
                warn!(?context, ?kind, "market history lookup failed: {}", e);
                return None;
            }
        };

        let prediction = forecast(&history.values());
        Some(TrendForecast {
            series_kind: kind,
            history,
            prediction,
        })
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::calculations::{TaxStrategy, TrendStatus};
    use crate::provider::ProviderError;
    use crate::{Catalog, HistoricalPoint, Perspective};

    struct StubProvider {
        rate: Option<MarketRate>,
        history: Vec<Decimal>,
    }

    #[async_trait]
    impl MarketDataProvider for StubProvider {
        async fn latest_rate(
            &self,
            _context: &MarketContext,
        ) -> Result<Option<MarketRate>, ProviderError> {
            Ok(self.rate)
        }

        async fn history(
            &self,
            _context: &MarketContext,
            kind: SeriesKind,
        ) -> Result<Option<HistoricalSeries>, ProviderError> {
            if self.history.is_empty() {
                return Ok(None);
            }
            let points = self
                .history
                .iter()
                .enumerate()
                .map(|(i, value)| HistoricalPoint {
                    period_label: format!("M{i}"),
                    value: *value,
                })
                .collect();
            Ok(Some(HistoricalSeries {
                kind,
                points,
                next_period_label: "next".to_string(),
            }))
        }

        async fn catalog(&self) -> Result<Catalog, ProviderError> {
            Ok(Catalog::default())
        }
    }

    struct FailingProvider;

    #[async_trait]
    impl MarketDataProvider for FailingProvider {
        async fn latest_rate(
            &self,
            _context: &MarketContext,
        ) -> Result<Option<MarketRate>, ProviderError> {
            Err(ProviderError::Unavailable("offline".into()))
        }

        async fn history(
            &self,
            _context: &MarketContext,
            _kind: SeriesKind,
        ) -> Result<Option<HistoricalSeries>, ProviderError> {
            Err(ProviderError::Unavailable("offline".into()))
        }

        async fn catalog(&self) -> Result<Catalog, ProviderError> {
            Err(ProviderError::Unavailable("offline".into()))
        }
    }

    fn request(perspective: Perspective) -> EvaluationRequest {
        EvaluationRequest {
            gross_salary: dec!(8000.00),
            extra_benefits: dec!(0),
            gross_revenue: dec!(20000.00),
            costs: dec!(0),
            tax_rate_override: None,
            perspective,
            context: MarketContext::new("Desenvolvimento de Software", "Sênior", "São Paulo - SP"),
        }
    }

    fn covered_provider() -> StubProvider {
        StubProvider {
            rate: Some(MarketRate {
                employment_average: dec!(7000),
                contractor_average: dec!(18000),
            }),
            history: vec![dec!(6800), dec!(6900), dec!(7000)],
        }
    }

    // =========================================================================
    // evaluate tests
    // =========================================================================

    #[tokio::test]
    async fn evaluate_with_market_data_fills_every_section() {
        let config = EngineConfig::default();
        let provider = covered_provider();
        let service = ComparisonService::new(&config, &provider);

        let report = service
            .evaluate(&request(Perspective::Employment))
            .await
            .unwrap();

        assert_eq!(report.employment.equivalent_value, dec!(8025.58));
        assert_eq!(report.contractor.strategy, TaxStrategy::AnexoIiiFatorR);
        assert_eq!(report.contractor.net_value_with_provisioning, dec!(14877.05));
        assert_eq!(report.difference, dec!(6851.47));

        let benchmark = report.benchmark.unwrap();
        assert!((benchmark.mean - 7000.0).abs() < 1e-9);
        assert!(benchmark.z_score > 0.0);

        let trend = report.trend.unwrap();
        assert_eq!(trend.series_kind, SeriesKind::Employment);
        assert_eq!(trend.history.points.len(), 3);
        assert_eq!(trend.prediction.unwrap().status, TrendStatus::StrongUp);

        assert_eq!(
            report.benchmark_bar,
            Some(BenchmarkBar {
                proposal_value: dec!(8000.00),
                market_value: dec!(7000),
                percentage_diff: dec!(14.29),
                is_above: true,
                proposal_width: dec!(95),
                market_width: dec!(83.13),
            })
        );
        assert!(report.narrative.ends_with("Your CLT salary is 14% ABOVE the average."));
    }

    #[tokio::test]
    async fn contractor_perspective_tracks_contractor_history() {
        let config = EngineConfig::default();
        let provider = covered_provider();
        let service = ComparisonService::new(&config, &provider);

        let report = service
            .evaluate(&request(Perspective::Contractor))
            .await
            .unwrap();

        assert_eq!(report.trend.unwrap().series_kind, SeriesKind::Contractor);
        // Sign of the stored difference does not depend on perspective.
        assert_eq!(report.difference, dec!(6851.47));
        assert!(report.narrative.starts_with("Warning: the CLT proposal"));
    }

    #[tokio::test]
    async fn single_month_of_history_has_no_prediction() {
        let config = EngineConfig::default();
        let provider = StubProvider {
            history: vec![dec!(7000)],
            ..covered_provider()
        };
        let service = ComparisonService::new(&config, &provider);

        let report = service
            .evaluate(&request(Perspective::Employment))
            .await
            .unwrap();

        let trend = report.trend.unwrap();
        assert_eq!(trend.history.points.len(), 1);
        assert!(trend.prediction.is_none());
    }

    #[tokio::test]
    async fn missing_market_data_degrades_gracefully() {
        let config = EngineConfig::default();
        let provider = StubProvider {
            rate: None,
            history: Vec::new(),
        };
        let service = ComparisonService::new(&config, &provider);

        let report = service
            .evaluate(&request(Perspective::Employment))
            .await
            .unwrap();

        assert_eq!(report.market_rate, None);
        assert_eq!(report.benchmark, None);
        assert_eq!(report.trend, None);
        assert_eq!(report.benchmark_bar, None);
        assert!(
            report
                .narrative
                .ends_with("No market average is available for your CLT context.")
        );
    }

    #[tokio::test]
    async fn provider_errors_are_treated_as_absent() {
        let config = EngineConfig::default();
        let service = ComparisonService::new(&config, &FailingProvider);

        let report = service
            .evaluate(&request(Perspective::Employment))
            .await
            .unwrap();

        assert_eq!(report.market_rate, None);
        assert_eq!(report.trend, None);
        assert_eq!(report.difference, dec!(6851.47));
    }

    #[tokio::test]
    async fn works_through_a_trait_object() {
        let config = EngineConfig::default();
        let provider: Box<dyn MarketDataProvider> = Box::new(covered_provider());
        let service = ComparisonService::new(&config, provider.as_ref());

        let report = service
            .evaluate(&request(Perspective::Employment))
            .await
            .unwrap();

        assert!(report.market_rate.is_some());
    }

    #[tokio::test]
    async fn negative_amounts_surface_as_tax_errors() {
        let config = EngineConfig::default();
        let service = ComparisonService::new(&config, &FailingProvider);
        let request = EvaluationRequest {
            gross_salary: dec!(-1),
            ..request(Perspective::Employment)
        };

        assert_eq!(
            service.evaluate(&request).await,
            Err(EvaluationError::Tax(ProgressiveTaxError::NegativeBase(dec!(-1))))
        );
    }

    // =========================================================================
    // BenchmarkBar tests
    // =========================================================================

    #[test]
    fn bar_below_market_scales_proposal() {
        let bar = BenchmarkBar::new(dec!(5000), dec!(8000)).unwrap();

        assert_eq!(bar.percentage_diff, dec!(-37.50));
        assert!(!bar.is_above);
        assert_eq!(bar.proposal_width, dec!(59.38));
        assert_eq!(bar.market_width, dec!(95));
    }

    #[test]
    fn bar_at_market_is_full_width_and_above() {
        let bar = BenchmarkBar::new(dec!(6000), dec!(6000)).unwrap();

        assert!(bar.is_above);
        assert_eq!(bar.proposal_width, dec!(95));
        assert_eq!(bar.market_width, dec!(95));
    }

    #[test]
    fn bar_requires_positive_market_value() {
        assert_eq!(BenchmarkBar::new(dec!(5000), dec!(0)), None);
    }
}
