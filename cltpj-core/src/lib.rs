pub mod calculations;
pub mod format;
pub mod models;
pub mod provider;
pub mod request;
pub mod service;

pub use format::format_currency;
pub use models::*;
pub use provider::{MarketDataProvider, ProviderError};
pub use request::{EvaluationRequest, RawEvaluationInput, ValidationError};
pub use service::{BenchmarkBar, ComparisonReport, ComparisonService, EvaluationError, TrendForecast};
