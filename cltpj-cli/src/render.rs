//! Plain-text rendering of comparison results.

use cltpj_core::calculations::GaussianBenchmark;
use cltpj_core::service::TrendForecast;
use cltpj_core::{
    BenchmarkBar, Catalog, ComparisonReport, EvaluationRequest, MarketRate, SeriesKind,
    format_currency,
};
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;

const LABEL_WIDTH: usize = 26;

fn row(out: &mut String, label: &str, value: impl AsRef<str>) {
    out.push_str(&format!("  {label:<width$}{}\n", value.as_ref(), width = LABEL_WIDTH));
}

fn heading(out: &mut String, title: &str) {
    if !out.is_empty() {
        out.push('\n');
    }
    out.push_str(title);
    out.push('\n');
}

/// `0.155` → `15.50%`.
pub fn percent(fraction: Decimal) -> String {
    format!("{:.2}%", fraction * Decimal::ONE_HUNDRED)
}

fn signed(value: Decimal) -> String {
    if value > Decimal::ZERO {
        format!("+{}", format_currency(value))
    } else {
        format_currency(value)
    }
}

fn currency_f64(value: f64) -> String {
    Decimal::from_f64(value)
        .map(format_currency)
        .unwrap_or_else(|| "n/a".to_string())
}

/// Full multi-section report.
pub fn report(report: &ComparisonReport) -> String {
    let mut out = String::new();
    let clt = &report.employment;
    let pj = &report.contractor;

    heading(&mut out, "CLT (employment)");
    row(&mut out, "Gross salary", format_currency(clt.gross_salary));
    row(&mut out, "INSS", format_currency(clt.inss_discount));
    row(&mut out, "IRRF", format_currency(clt.irrf_discount));
    row(&mut out, "Net salary", format_currency(clt.net_salary));
    row(&mut out, "13th salary (monthly)", format_currency(clt.thirteenth_monthly));
    row(&mut out, "Vacation (monthly)", format_currency(clt.vacation_monthly));
    row(&mut out, "FGTS (monthly)", format_currency(clt.fgts_monthly));
    row(&mut out, "Extra benefits", format_currency(clt.extra_benefits));
    row(&mut out, "Equivalent value", format_currency(clt.equivalent_value));

    heading(&mut out, &format!("PJ (contractor) - {}", pj.strategy.label()));
    row(&mut out, "Gross revenue", format_currency(pj.gross_revenue));
    row(&mut out, "Costs", format_currency(pj.costs));
    row(&mut out, "Tax rate", percent(pj.tax_rate));
    row(&mut out, "Tax", format_currency(pj.tax_amount));
    if pj.pro_labore > Decimal::ZERO {
        row(&mut out, "Pro-labore", format_currency(pj.pro_labore));
        row(&mut out, "Pro-labore INSS", format_currency(pj.pro_labore_inss));
        row(&mut out, "Pro-labore IRRF", format_currency(pj.pro_labore_irrf));
    }
    row(&mut out, "Net value", format_currency(pj.net_value));
    row(&mut out, "13th provision", format_currency(pj.thirteenth_provision));
    row(&mut out, "Vacation provision", format_currency(pj.vacation_provision));
    row(&mut out, "Net with provisioning", format_currency(pj.net_value_with_provisioning));

    heading(&mut out, "Comparison");
    row(&mut out, "PJ minus CLT", signed(report.difference));

    if let Some(rate) = &report.market_rate {
        market(&mut out, rate, report.benchmark.as_ref(), report.benchmark_bar.as_ref());
    }
    if let Some(trend) = &report.trend {
        trend_section(&mut out, trend);
    }

    heading(&mut out, "Verdict");
    out.push_str(&format!("  {}\n", report.narrative));
    out
}

fn market(
    out: &mut String,
    rate: &MarketRate,
    benchmark: Option<&GaussianBenchmark>,
    bar: Option<&BenchmarkBar>,
) {
    heading(out, "Market");
    row(out, "CLT average", format_currency(rate.employment_average));
    row(out, "PJ average", format_currency(rate.contractor_average));

    if let Some(bar) = bar {
        let direction = if bar.is_above { "above" } else { "below" };
        row(
            out,
            "Salary vs average",
            format!("{}% {direction}", bar.percentage_diff.abs()),
        );
        row(out, "Bar widths", format!("{} / {}", bar.proposal_width, bar.market_width));
    }

    if let Some(b) = benchmark {
        let outlier = if b.is_outlier { " (outlier)" } else { "" };
        row(
            out,
            "Percentile",
            format!("{:.1} (z = {:.2}){outlier}", b.percentile, b.z_score),
        );
    }
}

fn trend_section(out: &mut String, trend: &TrendForecast) {
    let series = match trend.series_kind {
        SeriesKind::Employment => "CLT",
        SeriesKind::Contractor => "PJ",
    };
    heading(
        out,
        &format!("Trend ({series} history, {} months)", trend.history.points.len()),
    );

    for point in &trend.history.points {
        row(out, &point.period_label, format_currency(point.value));
    }

    match &trend.prediction {
        Some(prediction) => {
            row(
                out,
                "Status",
                format!("{} - {}", prediction.status_label, prediction.description),
            );
            row(out, "Slope", format!("{:+.2} / month", prediction.slope));
            row(
                out,
                &format!("Forecast ({})", trend.history.next_period_label),
                currency_f64(prediction.forecast_value),
            );
        }
        None => row(out, "Status", "not enough history to project"),
    }
}

/// One line per scenario in batch mode.
pub fn batch_line(index: usize, request: &EvaluationRequest, report: &ComparisonReport) -> String {
    format!(
        "{index:>3}. {} / {} / {}: CLT {} | PJ {} ({}) | PJ minus CLT {}",
        request.context.area,
        request.context.seniority,
        request.context.location,
        format_currency(report.employment.equivalent_value),
        format_currency(report.contractor.net_value_with_provisioning),
        report.contractor.strategy.label(),
        signed(report.difference),
    )
}

pub fn catalog(catalog: &Catalog) -> String {
    let mut out = String::new();
    for (title, values) in [
        ("Areas", &catalog.areas),
        ("Seniorities", &catalog.seniorities),
        ("Locations", &catalog.locations),
    ] {
        heading(&mut out, title);
        for value in values {
            out.push_str(&format!("  {value}\n"));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use cltpj_core::calculations::{ContractorEngine, EmploymentEngine};
    use cltpj_core::{EngineConfig, MarketContext, Perspective};
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn sample_report(market_rate: Option<MarketRate>) -> ComparisonReport {
        let config = EngineConfig::default();
        let employment = EmploymentEngine::new(&config.tax_tables)
            .valuate(dec!(8000.00), dec!(0))
            .unwrap();
        let contractor = ContractorEngine::new(&config.contractor, &config.tax_tables.irrf)
            .valuate(dec!(20000.00), dec!(0), None)
            .unwrap();
        let difference = contractor.net_value_with_provisioning - employment.equivalent_value;

        ComparisonReport {
            employment,
            contractor,
            market_rate,
            benchmark: None,
            trend: None,
            narrative: "Narrative text.".to_string(),
            benchmark_bar: market_rate
                .and_then(|r| BenchmarkBar::new(dec!(8000.00), r.employment_average)),
            difference,
        }
    }

    #[test]
    fn percent_formats_two_decimals() {
        assert_eq!(percent(dec!(0.155)), "15.50%");
        assert_eq!(percent(dec!(0.0144)), "1.44%");
        assert_eq!(percent(dec!(0.06)), "6.00%");
    }

    #[test]
    fn report_lists_both_sides_and_verdict() {
        let text = report(&sample_report(None));

        assert!(text.starts_with("CLT (employment)\n"));
        assert!(text.contains("  Net salary                R$ 6.192,40\n"));
        assert!(text.contains("PJ (contractor) - Simples Nacional - Anexo III (Fator R)\n"));
        assert!(text.contains("  Pro-labore IRRF           R$ 331,55\n"));
        assert!(text.contains("  PJ minus CLT              +R$ 6.851,47\n"));
        assert!(!text.contains("Market"));
        assert!(text.ends_with("Verdict\n  Narrative text.\n"));
    }

    #[test]
    fn report_includes_market_section_when_available() {
        let text = report(&sample_report(Some(MarketRate {
            employment_average: dec!(7000),
            contractor_average: dec!(18000),
        })));

        assert!(text.contains("  CLT average               R$ 7.000,00\n"));
        assert!(text.contains("  Salary vs average         14.29% above\n"));
        assert!(text.contains("  Bar widths                95 / 83.13\n"));
    }

    #[test]
    fn batch_line_summarises_one_scenario() {
        let request = EvaluationRequest {
            gross_salary: dec!(8000.00),
            extra_benefits: dec!(0),
            gross_revenue: dec!(20000.00),
            costs: dec!(0),
            tax_rate_override: None,
            perspective: Perspective::Employment,
            context: MarketContext::new("Marketing Digital", "Pleno", "São Paulo - SP"),
        };

        assert_eq!(
            batch_line(1, &request, &sample_report(None)),
            "  1. Marketing Digital / Pleno / São Paulo - SP: CLT R$ 8.025,58 | \
             PJ R$ 14.877,05 (Simples Nacional - Anexo III (Fator R)) | PJ minus CLT +R$ 6.851,47"
        );
    }

    #[test]
    fn catalog_prints_each_group() {
        let text = catalog(&Catalog {
            areas: vec!["Marketing Digital".into()],
            seniorities: vec!["Pleno".into()],
            locations: vec!["São Paulo - SP".into()],
        });

        assert_eq!(
            text,
            "Areas\n  Marketing Digital\n\nSeniorities\n  Pleno\n\nLocations\n  São Paulo - SP\n"
        );
    }
}
