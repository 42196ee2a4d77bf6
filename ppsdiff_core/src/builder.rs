//! Builder for `CaptureSession`.
//!
//! All fields are optional; unset ones fall back to the defaults in `config`
//! and an empty calibration. Values are validated on `build()`.

use crate::calibration::Calibration;
use crate::config::{EdgeCfg, SequencingCfg};
use crate::error::{BuildError, Result};
use crate::session::CaptureSession;

#[derive(Debug, Default, Clone)]
pub struct SessionBuilder {
    edges: Option<EdgeCfg>,
    sequencing: Option<SequencingCfg>,
    calibration: Option<Calibration>,
}

impl SessionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_edges(mut self, edges: EdgeCfg) -> Self {
        self.edges = Some(edges);
        self
    }

    /// Threshold voltages for channel 1 and channel 2.
    pub fn with_levels(self, level1: f64, level2: f64) -> Self {
        self.with_edges(EdgeCfg { level1, level2 })
    }

    pub fn with_sequencing(mut self, sequencing: SequencingCfg) -> Self {
        self.sequencing = Some(sequencing);
        self
    }

    /// Seed calibration. Stream lines still overwrite individual fields.
    pub fn with_calibration(mut self, calibration: Calibration) -> Self {
        self.calibration = Some(calibration);
        self
    }

    /// Seed calibration only when one is given.
    pub fn apply_calibration(self, calibration: Option<Calibration>) -> Self {
        match calibration {
            Some(c) => self.with_calibration(c),
            None => self,
        }
    }

    pub fn build(self) -> Result<CaptureSession> {
        let edges = self.edges.unwrap_or_default();
        if !edges.level1.is_finite() || !edges.level2.is_finite() {
            return Err(eyre::Report::new(BuildError::InvalidConfig(
                "edge levels must be finite",
            )));
        }

        let sequencing = self.sequencing.unwrap_or_default();
        if !sequencing.min_gap_s.is_finite() || !sequencing.max_gap_s.is_finite() {
            return Err(eyre::Report::new(BuildError::InvalidConfig(
                "sequencing gaps must be finite",
            )));
        }
        if sequencing.min_gap_s < 0.0 || sequencing.min_gap_s >= sequencing.max_gap_s {
            return Err(eyre::Report::new(BuildError::InvalidConfig(
                "sequencing window must satisfy 0 <= min_gap_s < max_gap_s",
            )));
        }

        let calibration = self.calibration.unwrap_or_default();
        if calibration.depth == Some(0) {
            return Err(eyre::Report::new(BuildError::InvalidConfig(
                "calibration depth must be >= 1",
            )));
        }

        tracing::debug!(
            level1 = edges.level1,
            level2 = edges.level2,
            max_gap_s = sequencing.max_gap_s,
            min_gap_s = sequencing.min_gap_s,
            "capture session configured"
        );
        Ok(CaptureSession::new(edges, sequencing, calibration))
    }
}
