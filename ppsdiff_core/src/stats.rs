//! Summary statistics over accepted offsets.

use crate::error::InsufficientData;
use crate::session::OffsetSample;

/// First and second moments plus extrema of the offsets, in seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatisticsSummary {
    pub count: usize,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    /// Sample standard deviation (Bessel-corrected).
    pub stddev: f64,
}

/// Summarize accepted samples. Needs at least two.
pub fn summarize(samples: &[OffsetSample]) -> Result<StatisticsSummary, InsufficientData> {
    let offsets: Vec<f64> = samples.iter().map(|s| s.offset_s).collect();
    summarize_offsets(&offsets)
}

/// [`summarize`] over bare offsets (seconds).
pub fn summarize_offsets(offsets: &[f64]) -> Result<StatisticsSummary, InsufficientData> {
    let count = offsets.len();
    if count < 2 {
        return Err(InsufficientData { count });
    }
    let n = count as f64;
    let mean = offsets.iter().sum::<f64>() / n;
    let (min, max) = offsets
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &o| {
            (lo.min(o), hi.max(o))
        });
    // Two-pass: deviations from the mean are squared, not raw offsets.
    let ss: f64 = offsets.iter().map(|o| (o - mean) * (o - mean)).sum();
    let stddev = (ss / (n - 1.0)).sqrt();
    Ok(StatisticsSummary {
        count,
        mean,
        min,
        max,
        stddev,
    })
}
