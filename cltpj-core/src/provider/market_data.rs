use async_trait::async_trait;
use thiserror::Error;

use crate::models::{Catalog, HistoricalSeries, MarketContext, MarketRate, SeriesKind};

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Market data unavailable: {0}")]
    Unavailable(String),

    #[error("Malformed market data: {0}")]
    Malformed(String),
}

/// Source of reference salary data.
///
/// `Ok(None)` means the context is simply not covered; callers treat errors
/// the same way after logging them.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Most recent averages for `context`.
    async fn latest_rate(
        &self,
        context: &MarketContext,
    ) -> Result<Option<MarketRate>, ProviderError>;

    /// Up to twelve most recent monthly observations, oldest first.
    async fn history(
        &self,
        context: &MarketContext,
        kind: SeriesKind,
    ) -> Result<Option<HistoricalSeries>, ProviderError>;

    /// Values offered for the categorical inputs.
    async fn catalog(&self) -> Result<Catalog, ProviderError>;
}
