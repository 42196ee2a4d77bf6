#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::missing_errors_doc,
    clippy::cast_precision_loss
)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
//! Timing offset between two pulse signals captured by an oscilloscope.
//!
//! This crate is IO-agnostic: it consumes the line-oriented capture stream
//! produced by the instrument-control side and turns it into offset samples
//! and summary statistics.
//!
//! ## Architecture
//!
//! - **Calibration**: time axis and per-channel vertical scale (`calibration`)
//! - **Decoding**: hex payload to voltages (`waveform`)
//! - **Edges**: sub-sample rising edge interpolation (`edges`)
//! - **Grammar**: one line to one `Directive` (`directive`)
//! - **Session**: per-trigger state and validity checks (`session`)
//! - **Statistics**: mean, extrema, sample standard deviation (`stats`)
//! - **Reporting**: fixed report layout and offset log (`report`)
//!
//! ## Units
//!
//! Offsets are carried in seconds and converted to nanoseconds only for
//! display and for the persisted log.

pub mod builder;
pub mod calibration;
pub mod config;
pub mod conversions;
pub mod diagnostics;
pub mod directive;
pub mod edges;
pub mod error;
pub mod report;
pub mod runner;
pub mod session;
pub mod stats;
pub mod util;
pub mod waveform;

pub use builder::SessionBuilder;
pub use calibration::{Calibration, Channel, VerticalScale};
pub use config::{EdgeCfg, SequencingCfg};
pub use diagnostics::{Diagnostic, DiagnosticSink, NullSink};
pub use directive::Directive;
pub use edges::find_rising_edges;
pub use report::{Report, write_offset_log};
pub use runner::run_stream;
pub use session::{CaptureSession, DropCounts, OffsetSample, SessionOutcome};
pub use stats::{StatisticsSummary, summarize, summarize_offsets};
pub use waveform::decode;
