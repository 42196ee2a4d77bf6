use thiserror::Error;

use crate::calibration::CalibrationField;

/// A calibration field was read before the stream (or the seed) set it.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("{0} used before being set")]
pub struct CalibrationUnset(pub CalibrationField);

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("odd-length hex payload ({len} characters)")]
    OddLength { len: usize },
    #[error("invalid hex character {ch:?} at offset {index}")]
    InvalidHex { index: usize, ch: char },
    #[error(transparent)]
    Calibration(#[from] CalibrationUnset),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DirectiveError {
    #[error("missing value for {tag}")]
    MissingValue { tag: &'static str },
    #[error("invalid number {value:?} for {tag}")]
    InvalidNumber { tag: &'static str, value: String },
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("not enough offsets for statistics ({count} accepted, need at least 2)")]
pub struct InsufficientData {
    pub count: usize,
}

#[derive(Debug, Error, Clone)]
pub enum AnalyzerError {
    #[error("io error: {0}")]
    Io(String),
    #[error("configuration error: {0}")]
    Config(String),
}

#[derive(Debug, Error, Clone)]
pub enum BuildError {
    #[error("invalid config: {0}")]
    InvalidConfig(&'static str),
}

pub type Result<T> = eyre::Result<T>;
pub use eyre::Report;
