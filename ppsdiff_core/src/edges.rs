//! Sub-sample rising edge detection.

/// All positions where `samples` rises from at-or-below `level` to strictly
/// above it, linearly interpolated between the two neighbouring samples.
///
/// A crossing between `s[i]` and `s[i + 1]` is reported as
/// `i + (level - s[i]) / (s[i + 1] - s[i])`, so it always lies in `[i, i + 1)`.
/// Results are in ascending order. NaN samples never produce a crossing.
pub fn find_rising_edges(samples: &[f64], level: f64) -> Vec<f64> {
    samples
        .windows(2)
        .enumerate()
        .filter_map(|(i, w)| {
            let (a, b) = (w[0], w[1]);
            // b > level >= a, so the denominator is strictly positive.
            (a <= level && b > level).then(|| i as f64 + (level - a) / (b - a))
        })
        .collect()
}

/// Why a channel could not supply exactly one edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeFault {
    Missing,
    TooMany(usize),
}

/// The single crossing of a trigger window, or why there isn't one.
pub fn sole_edge(edges: &[f64]) -> Result<f64, EdgeFault> {
    match edges {
        [] => Err(EdgeFault::Missing),
        [only] => Ok(*only),
        more => Err(EdgeFault::TooMany(more.len())),
    }
}
