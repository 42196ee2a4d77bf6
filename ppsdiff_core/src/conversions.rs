//! `From` implementations bridging `ppsdiff_config` types to `ppsdiff_core` types.

use crate::calibration::{Calibration, ChannelCalibration};
use crate::config::{EdgeCfg, SequencingCfg};

// ── EdgeCfg ──────────────────────────────────────────────────────────────────

impl From<&ppsdiff_config::EdgesCfg> for EdgeCfg {
    fn from(c: &ppsdiff_config::EdgesCfg) -> Self {
        Self {
            level1: c.level1,
            level2: c.level2,
        }
    }
}

// ── SequencingCfg ────────────────────────────────────────────────────────────

impl From<&ppsdiff_config::SequencingCfg> for SequencingCfg {
    fn from(c: &ppsdiff_config::SequencingCfg) -> Self {
        Self {
            max_gap_s: c.max_gap_s,
            min_gap_s: c.min_gap_s,
        }
    }
}

// ── Calibration ──────────────────────────────────────────────────────────────

impl From<&ppsdiff_config::ChannelSeed> for ChannelCalibration {
    fn from(c: &ppsdiff_config::ChannelSeed) -> Self {
        Self {
            y_increment: Some(c.increment),
            y_origin: Some(c.origin),
            y_reference: Some(c.reference),
        }
    }
}

impl From<&ppsdiff_config::CalibrationSeed> for Calibration {
    fn from(c: &ppsdiff_config::CalibrationSeed) -> Self {
        Self {
            depth: c.depth,
            x_increment: c.x_increment,
            x_origin: c.x_origin,
            x_reference: c.x_reference,
            ch1: c.y1.as_ref().map(ChannelCalibration::from).unwrap_or_default(),
            ch2: c.y2.as_ref().map(ChannelCalibration::from).unwrap_or_default(),
        }
    }
}
