//! Valuation and analysis engines.
//!
//! Everything here is a pure function of its inputs: the tax tables and
//! market figures are passed in by reference and nothing is cached.

pub mod benchmark;
pub mod common;
pub mod contractor;
pub mod employment;
pub mod narrator;
pub mod progressive;
pub mod trend;

pub use benchmark::{CurvePoint, GaussianBenchmark, benchmark};
pub use contractor::{
    ContractorEngine, ContractorValuation, Regime, RegimeOutcome, TaxStrategy, choose,
};
pub use employment::{EmploymentEngine, EmploymentValuation};
pub use narrator::{MarketPosition, SwitchVerdict, narrate};
pub use progressive::{BracketMode, ProgressiveTaxError};
pub use trend::{Severity, TrendPrediction, TrendStatus, forecast};
