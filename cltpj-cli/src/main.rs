use std::path::PathBuf;

use clap::Parser;
use cltpj_cli::{app, logging, render, scenarios};
use cltpj_core::RawEvaluationInput;
use tracing::debug;

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Compares a CLT salary against a PJ proposal.
///
/// Amounts accept `8000`, `8000.50` or `8,000.50`. Market
/// averages come from a CSV dataset; without one the comparison still runs.
#[derive(Debug, Parser)]
#[command(name = "cltpj", version, about)]
struct Cli {
    /// CLT monthly gross salary.
    #[arg(long)]
    gross_salary: Option<String>,

    /// Benefits already net of tax (meal voucher, health plan...).
    #[arg(long)]
    extra_benefits: Option<String>,

    /// PJ monthly gross revenue.
    #[arg(long)]
    gross_revenue: Option<String>,

    /// PJ monthly costs (accountant, equipment...).
    #[arg(long)]
    costs: Option<String>,

    /// Fixed PJ tax rate, e.g. `0.12` or `12%`. Omit to let the engine pick.
    #[arg(long)]
    tax_rate: Option<String>,

    /// Current work mode: `clt` or `pj`.
    #[arg(long, default_value = "clt")]
    perspective: String,

    #[arg(long, default_value = "")]
    area: String,

    #[arg(long, default_value = "")]
    seniority: String,

    #[arg(long, default_value = "")]
    location: String,

    /// Market salary CSV. Defaults to the configured path.
    #[arg(long)]
    dataset: Option<PathBuf>,

    /// TOML configuration file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Also append logs to this file.
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Print JSON instead of the text report.
    #[arg(long, default_value_t = false)]
    json: bool,

    /// List the areas, seniorities and locations the dataset knows about.
    #[arg(long, default_value_t = false)]
    list_catalog: bool,

    /// Evaluate every scenario in a CSV file instead of a single one.
    #[arg(long, conflicts_with = "list_catalog")]
    batch: Option<PathBuf>,
}

impl Cli {
    fn raw_input(&self) -> RawEvaluationInput {
        RawEvaluationInput {
            gross_salary: self.gross_salary.clone().unwrap_or_default(),
            extra_benefits: self.extra_benefits.clone().unwrap_or_default(),
            gross_revenue: self.gross_revenue.clone().unwrap_or_default(),
            costs: self.costs.clone().unwrap_or_default(),
            tax_rate: self.tax_rate.clone().unwrap_or_default(),
            perspective: self.perspective.clone(),
            area: self.area.clone(),
            seniority: self.seniority.clone(),
            location: self.location.clone(),
        }
    }
}

// ─── entry point ─────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = app::load_config(cli.config.as_deref())?;
    logging::init_logging(cli.log_file.as_deref().or(config.log_file.as_deref()))?;
    app::log_config_source(cli.config.as_deref(), &config);

    let dataset = app::load_dataset(&config, cli.dataset.as_deref());

    if cli.list_catalog {
        let catalog = app::catalog(&dataset).await?;
        if cli.json {
            println!("{}", app::to_json(&catalog)?);
        } else {
            print!("{}", render::catalog(&catalog));
        }
        return Ok(());
    }

    if let Some(path) = &cli.batch {
        let requests = scenarios::load_from_file(path)?;
        debug!(count = requests.len(), "scenarios loaded");
        let reports = app::evaluate_batch(&config, &dataset, &requests).await?;

        if cli.json {
            let entries: Vec<_> = requests
                .iter()
                .zip(&reports)
                .map(|(request, report)| app::BatchEntry { request, report })
                .collect();
            println!("{}", app::to_json(&entries)?);
        } else {
            for (idx, (request, report)) in requests.iter().zip(&reports).enumerate() {
                println!("{}", render::batch_line(idx + 1, request, report));
            }
        }
        return Ok(());
    }

    let request = cli.raw_input().validate()?;
    let report = app::evaluate(&config, &dataset, &request).await?;

    if cli.json {
        println!("{}", app::to_json(&report)?);
    } else {
        print!("{}", render::report(&report));
    }

    Ok(())
}
