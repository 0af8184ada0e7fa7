mod contractor_rules;
mod engine_config;
mod market;
mod perspective;
mod tax_bracket;
mod tax_tables;

pub use contractor_rules::ContractorRules;
pub use engine_config::{ConfigError, EngineConfig};
pub use market::{
    Catalog, HistoricalPoint, HistoricalSeries, MarketContext, MarketRate, SeriesKind,
};
pub use perspective::Perspective;
pub use tax_bracket::TaxBracket;
pub use tax_tables::{InssSchedule, IrrfSchedule, TaxTables};
