//! Glue between the command line, configuration, the market dataset, and
//! the comparison service.

use std::path::Path;

use anyhow::{Context, Result};
use cltpj_core::{
    Catalog, ComparisonReport, ComparisonService, EvaluationRequest, MarketDataProvider,
};
use cltpj_data::MarketDataset;
use serde::Serialize;
use tracing::{debug, info};

use crate::config::AppConfig;

/// One scenario of a batch run, as written by `--json`.
#[derive(Debug, Serialize)]
pub struct BatchEntry<'a> {
    pub request: &'a EvaluationRequest,
    pub report: &'a ComparisonReport,
}

/// Loads `path` when given, otherwise the built-in defaults.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig> {
    match path {
        Some(path) => AppConfig::load(path)
            .with_context(|| format!("failed to load configuration from {}", path.display())),
        None => Ok(AppConfig::default()),
    }
}

/// Records where the configuration came from. Configuration is read before
/// logging starts, so this runs once the subscriber is installed.
pub fn log_config_source(path: Option<&Path>, config: &AppConfig) {
    match path {
        Some(path) => info!(
            path = %path.display(),
            dataset = %config.dataset_path(None).display(),
            "configuration loaded"
        ),
        None => debug!("no configuration file, using built-in defaults"),
    }
}

/// A missing or unreadable dataset yields an empty one; evaluations still
/// run without the market sections.
pub fn load_dataset(config: &AppConfig, override_path: Option<&Path>) -> MarketDataset {
    let path = config.dataset_path(override_path);
    let dataset = MarketDataset::load_or_empty(&path);
    debug!(path = %path.display(), rows = dataset.len(), "market dataset ready");
    dataset
}

pub async fn evaluate(
    config: &AppConfig,
    dataset: &MarketDataset,
    request: &EvaluationRequest,
) -> Result<ComparisonReport> {
    ComparisonService::new(&config.engine, dataset)
        .evaluate(request)
        .await
        .context("evaluation failed")
}

/// Evaluates every scenario in order, stopping at the first failure.
pub async fn evaluate_batch(
    config: &AppConfig,
    dataset: &MarketDataset,
    requests: &[EvaluationRequest],
) -> Result<Vec<ComparisonReport>> {
    let service = ComparisonService::new(&config.engine, dataset);
    let mut reports = Vec::with_capacity(requests.len());

    for (idx, request) in requests.iter().enumerate() {
        let report = service
            .evaluate(request)
            .await
            .with_context(|| format!("scenario {} failed", idx + 1))?;
        reports.push(report);
    }

    info!(scenarios = reports.len(), "batch evaluated");
    Ok(reports)
}

pub async fn catalog(dataset: &MarketDataset) -> Result<Catalog> {
    dataset
        .catalog()
        .await
        .context("failed to build the selection catalog")
}

pub fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).context("failed to serialize output")
}
