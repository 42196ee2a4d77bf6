//! User-facing report layout and the persisted offset log.

use std::fmt;
use std::io::{self, Write};

use crate::session::OffsetSample;
use crate::stats::StatisticsSummary;
use crate::util::{Repr, to_ns};

/// Fixed-layout statistics report, values in nanoseconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Report {
    pub summary: StatisticsSummary,
    /// Sample spacing in seconds; omitted from the layout when unknown.
    pub resolution_s: Option<f64>,
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = &self.summary;
        writeln!(f, "Samples: {:9}", s.count)?;
        if let Some(res) = self.resolution_s {
            writeln!(f, "Resolution:{:7.1} ns", to_ns(res))?;
        }
        writeln!(f, "Mean:    {:+9.1} ns", to_ns(s.mean))?;
        writeln!(f, "Min:     {:+9.1} ns", to_ns(s.min))?;
        writeln!(f, "Max:     {:+9.1} ns", to_ns(s.max))?;
        writeln!(f, "StdDev:  {:9.1} ns", to_ns(s.stddev))
    }
}

/// `<timestamp> <signed offset ns, 1 decimal>`
pub fn offset_log_line(sample: &OffsetSample) -> String {
    format!("{} {:+.1}", Repr(sample.timestamp), to_ns(sample.offset_s))
}

/// Write one line per accepted sample, in order.
pub fn write_offset_log<W: Write>(mut out: W, samples: &[OffsetSample]) -> io::Result<()> {
    for sample in samples {
        writeln!(out, "{}", offset_log_line(sample))?;
    }
    out.flush()
}
