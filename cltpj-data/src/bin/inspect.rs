use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use cltpj_core::{MarketDataProvider, format_currency};
use cltpj_data::MarketDataset;

/// Inspect a market salary CSV file.
///
/// The CSV file should have the following columns:
/// - period: month of the observation as YYYY-MM (optional, may be empty)
/// - area, seniority, location: the lookup context
/// - clt_avg: average monthly CLT gross salary
/// - pj_avg: average monthly PJ revenue
#[derive(Parser, Debug)]
#[command(name = "market-data-inspect")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the CSV file containing market salary data
    #[arg(short, long)]
    file: PathBuf,

    /// Print the latest averages for every context
    #[arg(short, long, default_value_t = false)]
    list: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let dataset = MarketDataset::load(&args.file)
        .with_context(|| format!("Failed to load market data: {}", args.file.display()))?;

    let contexts = dataset.contexts();
    println!("Rows:     {}", dataset.len());
    println!("Contexts: {}", contexts.len());
    match dataset.period_range() {
        Some((first, last)) => println!(
            "Periods:  {} to {}",
            first.format("%Y-%m"),
            last.format("%Y-%m")
        ),
        None => println!("Periods:  none (undated snapshot)"),
    }

    if args.list {
        println!();
        for context in &contexts {
            let rate = dataset
                .latest_rate(context)
                .await
                .context("Failed to look up market rate")?;
            if let Some(rate) = rate {
                println!(
                    "{} / {} / {}: CLT {}  PJ {}",
                    context.area,
                    context.seniority,
                    context.location,
                    format_currency(rate.employment_average),
                    format_currency(rate.contractor_average)
                );
            }
        }
    }

    let catalog = dataset.catalog().await.context("Failed to build catalog")?;
    println!();
    println!("Areas:     {}", catalog.areas.join(", "));
    println!("Locations: {}", catalog.locations.join(", "));

    Ok(())
}
