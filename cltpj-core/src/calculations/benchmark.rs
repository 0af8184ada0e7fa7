//! Gaussian market positioning.
//!
//! The reference dataset only carries monthly means, so dispersion is
//! assumed: σ = 18% of the mean. A salary is then placed on that normal
//! curve by z-score and percentile.

use std::f64::consts::{PI, SQRT_2};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculations::common::decimal_to_f64;

/// Assumed standard deviation as a fraction of the mean.
pub const DISPERSION_RATIO: f64 = 0.18;

/// Two-sided 95% bound; strictly beyond it a salary is an outlier.
pub const OUTLIER_Z: f64 = 1.96;

/// Samples in the display curve.
pub const CURVE_POINTS: usize = 100;

/// Curve spans mean ± this many standard deviations.
pub const CURVE_SPAN_SIGMAS: f64 = 4.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurvePoint {
    pub x: f64,
    /// Density rescaled so the curve's peak is 100.
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GaussianBenchmark {
    pub observed: f64,
    pub mean: f64,
    pub standard_deviation: f64,
    pub z_score: f64,
    /// Share of the market below `observed`, 0–100.
    pub percentile: f64,
    pub is_outlier: bool,
    pub curve: Vec<CurvePoint>,
}

/// Places `observed` on a normal curve centred on `market_mean`.
///
/// Returns `None` when the mean is missing or not positive.
///
/// ```
/// use rust_decimal_macros::dec;
/// use cltpj_core::calculations::benchmark::benchmark;
///
/// let result = benchmark(dec!(6000), Some(dec!(6000))).unwrap();
/// assert_eq!(result.z_score, 0.0);
/// assert!((result.percentile - 50.0).abs() < 1e-6);
///
/// assert!(benchmark(dec!(6000), Some(dec!(0))).is_none());
/// assert!(benchmark(dec!(6000), None).is_none());
/// ```
pub fn benchmark(observed: Decimal, market_mean: Option<Decimal>) -> Option<GaussianBenchmark> {
    let mean = market_mean.filter(|m| *m > Decimal::ZERO).map(decimal_to_f64)?;
    let observed = decimal_to_f64(observed);
    let standard_deviation = DISPERSION_RATIO * mean;

    let z_score = (observed - mean) / standard_deviation;
    let percentile = 50.0 * (1.0 + erf(z_score / SQRT_2));

    Some(GaussianBenchmark {
        observed,
        mean,
        standard_deviation,
        z_score,
        percentile,
        is_outlier: is_outlier(z_score),
        curve: density_curve(mean, standard_deviation),
    })
}

pub fn is_outlier(z_score: f64) -> bool {
    z_score.abs() > OUTLIER_Z
}

fn density_curve(mean: f64, sd: f64) -> Vec<CurvePoint> {
    let start = mean - CURVE_SPAN_SIGMAS * sd;
    let step = (2.0 * CURVE_SPAN_SIGMAS * sd) / (CURVE_POINTS - 1) as f64;

    let raw: Vec<(f64, f64)> = (0..CURVE_POINTS)
        .map(|i| {
            let x = start + step * i as f64;
            (x, normal_pdf(x, mean, sd))
        })
        .collect();

    let peak = raw.iter().map(|(_, y)| *y).fold(0.0_f64, f64::max);

    raw.into_iter()
        .map(|(x, y)| CurvePoint {
            x,
            y: if peak > 0.0 { y / peak * 100.0 } else { 0.0 },
        })
        .collect()
}

fn normal_pdf(x: f64, mean: f64, sd: f64) -> f64 {
    let z = (x - mean) / sd;
    (-0.5 * z * z).exp() / (sd * (2.0 * PI).sqrt())
}

/// Error function, Abramowitz & Stegun 7.1.26 (|error| < 1.5e-7).
pub fn erf(x: f64) -> f64 {
    if x == 0.0 {
        return 0.0;
    }

    const A1: f64 = 0.254_829_592;
    const A2: f64 = -0.284_496_736;
    const A3: f64 = 1.421_413_741;
    const A4: f64 = -1.453_152_027;
    const A5: f64 = 1.061_405_429;
    const P: f64 = 0.327_591_1;

    let sign = x.signum();
    let x = x.abs();
    let t = 1.0 / (1.0 + P * x);
    let poly = ((((A5 * t + A4) * t + A3) * t + A2) * t + A1) * t;

    sign * (1.0 - poly * (-x * x).exp())
}
