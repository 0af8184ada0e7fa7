use std::io::Read;

use chrono::NaiveDate;
use cltpj_core::{MarketContext, MarketRate};
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur when loading market salary data.
#[derive(Debug, Error)]
pub enum MarketDataLoaderError {
    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("Invalid record on row {row}: {reason}")]
    InvalidRecord { row: usize, reason: String },

    #[error("Cannot read market data file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl From<csv::Error> for MarketDataLoaderError {
    fn from(err: csv::Error) -> Self {
        MarketDataLoaderError::CsvParse(err.to_string())
    }
}

/// A single record from the market salary CSV file.
///
/// - `period`: month of the observation as `YYYY-MM`; empty (or no column at
///   all) for an undated snapshot
/// - `area`, `seniority`, `location`: the lookup context
/// - `clt_avg`: average monthly CLT gross salary
/// - `pj_avg`: average monthly PJ revenue
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct MarketRateRecord {
    /// First day of the observed month.
    #[serde(default, deserialize_with = "deserialize_optional_period")]
    pub period: Option<NaiveDate>,
    pub area: String,
    pub seniority: String,
    pub location: String,
    pub clt_avg: Decimal,
    pub pj_avg: Decimal,
}

impl MarketRateRecord {
    pub fn context(&self) -> MarketContext {
        MarketContext::new(&self.area, &self.seniority, &self.location)
    }

    pub fn matches(&self, context: &MarketContext) -> bool {
        self.area == context.area
            && self.seniority == context.seniority
            && self.location == context.location
    }

    pub fn rate(&self) -> MarketRate {
        MarketRate {
            employment_average: self.clt_avg,
            contractor_average: self.pj_avg,
        }
    }
}

/// Parses `YYYY-MM` into the first day of that month.
pub fn parse_period(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(&format!("{}-01", s.trim()), "%Y-%m-%d").ok()
}

fn deserialize_optional_period<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => parse_period(&s)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid period '{s}', expected YYYY-MM"))),
        None => Ok(None),
    }
}

/// Loader for market salary data from CSV files.
///
/// Columns are matched by header name, so their order does not matter, and
/// surrounding whitespace is trimmed from every field.
pub struct MarketDataLoader;

impl MarketDataLoader {
    /// Parse market rate records from a CSV reader.
    ///
    /// The reader can be any type that implements `Read`, such as a file or a
    /// string slice.
    pub fn parse<R: Read>(reader: R) -> Result<Vec<MarketRateRecord>, MarketDataLoaderError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut records = Vec::new();

        for (index, result) in csv_reader.deserialize().enumerate() {
            let record: MarketRateRecord = result?;
            validate_record(index + 1, &record)?;
            records.push(record);
        }

        Ok(records)
    }
}

fn validate_record(row: usize, record: &MarketRateRecord) -> Result<(), MarketDataLoaderError> {
    let invalid = |reason: &str| MarketDataLoaderError::InvalidRecord {
        row,
        reason: reason.to_string(),
    };

    if record.area.is_empty() || record.seniority.is_empty() || record.location.is_empty() {
        return Err(invalid("area, seniority and location are required"));
    }
    if record.clt_avg < Decimal::ZERO || record.pj_avg < Decimal::ZERO {
        return Err(invalid("averages must not be negative"));
    }
    Ok(())
}
