#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
//! Config schema and offset-log parsing for the PPS offset analyzer.
//!
//! - `Config` and sub-structs are deserialized from TOML and validated.
//! - The offset-log loader reads back the per-sample log written by an
//!   earlier `analyze` run so statistics can be recomputed offline.
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// One line of a persisted offset log.
///
/// Layout (space separated, no header):
/// <timestamp> <signed offset in ns>
///
/// Example:
/// 1600000000.0 +12.5
/// 1600000001.0 -3.0
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
pub struct OffsetRow {
    pub timestamp: f64,
    pub offset_ns: f64,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct EdgesCfg {
    /// Rising-edge threshold for channel 1 (volts)
    pub level1: f64,
    /// Rising-edge threshold for channel 2 (volts)
    pub level2: f64,
}

impl Default for EdgesCfg {
    fn default() -> Self {
        Self {
            level1: 1.0,
            level2: 1.0,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct SequencingCfg {
    /// Report a missing trigger when consecutive accepted triggers are further apart (s)
    pub max_gap_s: f64,
    /// Report an extra trigger when consecutive accepted triggers are closer (s)
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

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct Output {
    /// Where to write the per-sample offset log
    pub offsets: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct Logging {
    pub file: Option<String>,  // path to .log (JSON lines)
    pub level: Option<String>, // "info","debug"
    /// Log rotation policy: "never" | "daily" | "hourly" (default: never)
    pub rotation: Option<String>,
}

/// Vertical calibration of one channel, as reported by the scope preamble.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
pub struct ChannelSeed {
    pub increment: f64,
    pub origin: f64,
    pub reference: f64,
}

/// Calibration known before the stream starts. Stream lines overwrite it.
#[derive(Debug, Deserialize, Default, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct CalibrationSeed {
    pub depth: Option<usize>,
    pub x_increment: Option<f64>,
    pub x_origin: Option<f64>,
    pub x_reference: Option<f64>,
    pub y1: Option<ChannelSeed>,
    pub y2: Option<ChannelSeed>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct Config {
    #[serde(default)]
    pub edges: EdgesCfg,
    #[serde(default)]
    pub sequencing: SequencingCfg,
    #[serde(default)]
    pub output: Output,
    #[serde(default)]
    pub logging: Logging,
    /// Optional calibration seed; the capture stream normally supplies it.
    #[serde(default)]
    pub calibration: Option<CalibrationSeed>,
}

pub fn load_toml(s: &str) -> Result<Config, toml::de::Error> {
    toml::from_str::<Config>(s)
}

/// Read, parse and validate a config file.
pub fn load_config(path: &Path) -> eyre::Result<Config> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| eyre::eyre!("read config {:?}: {}", path, e))?;
    let cfg = load_toml(&text).map_err(|e| eyre::eyre!("parse config {:?}: {}", path, e))?;
    cfg.validate()
        .map_err(|e| eyre::eyre!("invalid configuration in {:?}: {}", path, e))?;
    Ok(cfg)
}

/// Load a persisted offset log. Blank lines and `#` comments are skipped.
pub fn load_offset_log(path: &Path) -> eyre::Result<Vec<OffsetRow>> {
    let rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .delimiter(b' ')
        .comment(Some(b'#'))
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| eyre::eyre!("open offset log {:?}: {}", path, e))?;
    read_offset_rows(rdr)
}

/// Same as [`load_offset_log`] but over any reader.
pub fn parse_offset_log<R: std::io::Read>(reader: R) -> eyre::Result<Vec<OffsetRow>> {
    let rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .delimiter(b' ')
        .comment(Some(b'#'))
        .trim(csv::Trim::All)
        .from_reader(reader);
    read_offset_rows(rdr)
}

fn read_offset_rows<R: std::io::Read>(mut rdr: csv::Reader<R>) -> eyre::Result<Vec<OffsetRow>> {
    let mut rows = Vec::new();
    for (idx, rec) in rdr.deserialize::<OffsetRow>().enumerate() {
        match rec {
            Ok(row) => rows.push(row),
            Err(e) => {
                let line = e.position().map_or(idx + 1, |p| p.line() as usize);
                eyre::bail!("invalid offset log line {}: {}", line, e);
            }
        }
    }
    Ok(rows)
}

impl ChannelSeed {
    fn validate(&self, name: &str) -> eyre::Result<()> {
        if !self.increment.is_finite() || self.increment == 0.0 {
            eyre::bail!("calibration.{name}.increment must be finite and non-zero");
        }
        if !self.origin.is_finite() || !self.reference.is_finite() {
            eyre::bail!("calibration.{name}.origin/reference must be finite");
        }
        Ok(())
    }
}

impl Config {
    pub fn validate(&self) -> eyre::Result<()> {
        // Edges
        if !self.edges.level1.is_finite() {
            eyre::bail!("edges.level1 must be a finite voltage");
        }
        if !self.edges.level2.is_finite() {
            eyre::bail!("edges.level2 must be a finite voltage");
        }

        // Sequencing
        let seq = &self.sequencing;
        if !seq.min_gap_s.is_finite() || !seq.max_gap_s.is_finite() {
            eyre::bail!("sequencing gaps must be finite");
        }
        if seq.min_gap_s < 0.0 {
            eyre::bail!("sequencing.min_gap_s must be >= 0");
        }
        if seq.min_gap_s >= seq.max_gap_s {
            eyre::bail!("sequencing.min_gap_s must be < sequencing.max_gap_s");
        }

        // Logging
        if let Some(rot) = self.logging.rotation.as_deref()
            && !matches!(rot, "never" | "daily" | "hourly")
        {
            eyre::bail!("logging.rotation must be one of never|daily|hourly, got {rot:?}");
        }

        // Calibration seed
        if let Some(cal) = &self.calibration {
            if cal.depth == Some(0) {
                eyre::bail!("calibration.depth must be >= 1");
            }
            if let Some(xinc) = cal.x_increment
                && (!xinc.is_finite() || xinc == 0.0)
            {
                eyre::bail!("calibration.x_increment must be finite and non-zero");
            }
            if let Some(y1) = &cal.y1 {
                y1.validate("y1")?;
            }
            if let Some(y2) = &cal.y2 {
                y2.validate("y2")?;
            }
        }

        Ok(())
    }
}
