//! Runtime configuration for a capture session.
//!
//! Separate from the TOML-deserialized config in `ppsdiff_config`; see
//! `conversions` for the mapping.

use crate::calibration::Channel;

/// Rising-edge thresholds, one per channel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeCfg {
    /// Channel 1 threshold in volts. Default: 1.0 V.
    pub level1: f64,
    /// Channel 2 threshold in volts. Default: 1.0 V.
    pub level2: f64,
}

impl EdgeCfg {
    pub fn level(&self, channel: Channel) -> f64 {
        match channel {
            Channel::One => self.level1,
            Channel::Two => self.level2,
        }
    }
}

impl Default for EdgeCfg {
    fn default() -> Self {
        Self {
            level1: 1.0,
            level2: 1.0,
        }
    }
}

/// Expected spacing of consecutive accepted triggers (seconds).
///
/// Both checks are advisory: they produce diagnostics but never drop a trigger.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SequencingCfg {
    /// A larger gap means at least one trigger went missing. Default: 1.5 s.
    pub max_gap_s: f64,
    /// A smaller gap means an extra trigger was captured. Default: 0.5 s.
    pub min_gap_s: f64,
}

impl Default for SequencingCfg {
    fn default() -> Self {
        Self {
            max_gap_s: 1.5,
            min_gap_s: 0.5,
        }
    }
}
