//! Common unit and formatting helpers for ppsdiff_core.

use std::fmt;

/// Number of nanoseconds in one second.
pub const NANOS_PER_SEC: f64 = 1e9;

/// Convert seconds to nanoseconds.
#[inline]
pub fn to_ns(seconds: f64) -> f64 {
    seconds * NANOS_PER_SEC
}

/// Shortest round-trip rendering of a float that always keeps a fractional
/// part for integral values (`3.0`, not `3`).
///
/// Used for timestamps in diagnostics and the offset log so that they read
/// back exactly as the capture side wrote them.
#[derive(Debug, Clone, Copy)]
pub struct Repr(pub f64);

impl fmt::Display for Repr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.0)
    }
}
