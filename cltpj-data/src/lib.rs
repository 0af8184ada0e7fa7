pub mod dataset;
pub mod loader;

pub use dataset::MarketDataset;
pub use loader::{MarketDataLoader, MarketDataLoaderError, MarketRateRecord};
