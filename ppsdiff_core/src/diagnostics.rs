//! Per-line and per-trigger diagnostics emitted while consuming a capture.
//!
//! None of these stop the run. Drop diagnostics discard the trigger; the
//! rest are informational.

use std::fmt;

use crate::calibration::{CalibrationField, Channel};
use crate::error::{DecodeError, DirectiveError};
use crate::util::Repr;

#[derive(Debug, Clone, PartialEq)]
pub enum Diagnostic {
    UnknownTag {
        tag: String,
    },
    Malformed(DirectiveError),
    MissingTimestamp {
        trigger: u64,
    },
    MissingTrigger {
        last: f64,
        timestamp: f64,
    },
    ExtraTrigger {
        timestamp: f64,
        trigger: u64,
    },
    MissingWaveform {
        timestamp: f64,
        trigger: u64,
    },
    BadWaveform {
        timestamp: f64,
        trigger: u64,
        channel: Channel,
        error: DecodeError,
    },
    Uncalibrated {
        timestamp: f64,
        trigger: u64,
        field: CalibrationField,
    },
    ShortWaveform {
        timestamp: f64,
        trigger: u64,
        channel: Channel,
        len: usize,
        depth: usize,
    },
    MissingEdge {
        timestamp: f64,
        trigger: u64,
    },
    TooManyEdges {
        timestamp: f64,
        trigger: u64,
    },
}

impl Diagnostic {
    /// Stable machine-readable name.
    pub fn kind(&self) -> &'static str {
        match self {
            Diagnostic::UnknownTag { .. } => "unknown_tag",
            Diagnostic::Malformed(_) => "malformed",
            Diagnostic::MissingTimestamp { .. } => "missing_timestamp",
            Diagnostic::MissingTrigger { .. } => "missing_trigger",
            Diagnostic::ExtraTrigger { .. } => "extra_trigger",
            Diagnostic::MissingWaveform { .. } => "missing_waveform",
            Diagnostic::BadWaveform { .. } => "bad_waveform",
            Diagnostic::Uncalibrated { .. } => "uncalibrated",
            Diagnostic::ShortWaveform { .. } => "short_waveform",
            Diagnostic::MissingEdge { .. } => "missing_edge",
            Diagnostic::TooManyEdges { .. } => "too_many_edges",
        }
    }

    /// Whether the diagnostic discards the trigger it refers to.
    pub fn drops_trigger(&self) -> bool {
        !matches!(
            self,
            Diagnostic::UnknownTag { .. }
                | Diagnostic::Malformed(_)
                | Diagnostic::MissingTrigger { .. }
                | Diagnostic::ExtraTrigger { .. }
        )
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::UnknownTag { tag } => write!(f, "unknown data {tag}"),
            Diagnostic::Malformed(e) => write!(f, "malformed line: {e}"),
            Diagnostic::MissingTimestamp { trigger } => {
                write!(f, "missing trigger timestamp after trigger #{trigger}")
            }
            Diagnostic::MissingTrigger { last, timestamp } => {
                write!(
                    f,
                    "missing trigger between {} and {}",
                    Repr(*last),
                    Repr(*timestamp)
                )
            }
            Diagnostic::ExtraTrigger { timestamp, trigger } => {
                write!(f, "extra trigger at {} trigger #{trigger}", Repr(*timestamp))
            }
            Diagnostic::MissingWaveform { timestamp, trigger } => {
                write!(f, "missing waveform at {} trigger #{trigger}", Repr(*timestamp))
            }
            Diagnostic::BadWaveform {
                timestamp,
                trigger,
                channel,
                error,
            } => write!(
                f,
                "bad waveform on {channel} at {} trigger #{trigger}: {error}",
                Repr(*timestamp)
            ),
            Diagnostic::Uncalibrated {
                timestamp,
                trigger,
                field,
            } => write!(
                f,
                "{field} not set at {} trigger #{trigger}",
                Repr(*timestamp)
            ),
            Diagnostic::ShortWaveform {
                timestamp,
                trigger,
                channel,
                len,
                depth,
            } => write!(
                f,
                "short waveform on {channel} at {} trigger #{trigger} ({len} of {depth} samples)",
                Repr(*timestamp)
            ),
            Diagnostic::MissingEdge { timestamp, trigger } => {
                write!(f, "missing edge at {} trigger #{trigger}", Repr(*timestamp))
            }
            Diagnostic::TooManyEdges { timestamp, trigger } => {
                write!(f, "too many edges at {} trigger #{trigger}", Repr(*timestamp))
            }
        }
    }
}

/// Receives diagnostics as the session produces them.
pub trait DiagnosticSink {
    fn report(&mut self, diagnostic: Diagnostic);
}

impl DiagnosticSink for Vec<Diagnostic> {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl DiagnosticSink for NullSink {
    fn report(&mut self, _diagnostic: Diagnostic) {}
}
