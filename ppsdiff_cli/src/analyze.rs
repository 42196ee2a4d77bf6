//! Command implementations: stream analysis, offset-log statistics, config check.

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::AtomicBool;

use ppsdiff_config::Config;
use ppsdiff_core::error::{AnalyzerError, InsufficientData, Result as CoreResult};
use ppsdiff_core::util::{NANOS_PER_SEC, to_ns};
use ppsdiff_core::{
    Calibration, Diagnostic, DiagnosticSink, EdgeCfg, Report, SequencingCfg, SessionBuilder,
    SessionOutcome, run_stream, summarize_offsets, write_offset_log,
};
use serde_json::json;

/// `analyze` arguments after clap parsing.
#[derive(Debug, Default)]
pub struct AnalyzeArgs {
    pub level1: Option<f64>,
    pub level2: Option<f64>,
    pub output: Option<PathBuf>,
    pub input: Option<PathBuf>,
}

/// Prints diagnostics on stdout as they arrive, one per line.
struct ConsoleSink<W: Write> {
    out: W,
    json: bool,
    failed: Option<io::Error>,
}

impl<W: Write> ConsoleSink<W> {
    fn new(out: W, json: bool) -> Self {
        Self {
            out,
            json,
            failed: None,
        }
    }

    fn into_inner(self) -> CoreResult<W> {
        match self.failed {
            Some(e) => Err(AnalyzerError::Io(format!("write diagnostics: {e}")).into()),
            None => Ok(self.out),
        }
    }
}

impl<W: Write> DiagnosticSink for ConsoleSink<W> {
    fn report(&mut self, diagnostic: Diagnostic) {
        if self.failed.is_some() {
            return;
        }
        let res = if self.json {
            let line = json!({ "diagnostic": diagnostic.kind(), "message": diagnostic.to_string() });
            writeln!(self.out, "{line}")
        } else {
            writeln!(self.out, "{diagnostic}")
        };
        if let Err(e) = res {
            self.failed = Some(e);
        }
    }
}

/// Levels and sequencing window: CLI flag > config file > default.
pub fn effective_settings(cfg: &Config, level1: Option<f64>, level2: Option<f64>) -> (EdgeCfg, SequencingCfg) {
    let mut edges = EdgeCfg::from(&cfg.edges);
    if let Some(v) = level1 {
        edges.level1 = v;
    }
    if let Some(v) = level2 {
        edges.level2 = v;
    }
    (edges, SequencingCfg::from(&cfg.sequencing))
}

fn open_input(input: Option<&Path>) -> CoreResult<Box<dyn BufRead>> {
    match input {
        Some(path) if path != Path::new("-") => {
            let file = File::open(path)
                .map_err(|e| AnalyzerError::Io(format!("open capture {path:?}: {e}")))?;
            Ok(Box::new(BufReader::new(file)))
        }
        _ => Ok(Box::new(io::stdin().lock())),
    }
}

pub fn run_analyze(cfg: &Config, args: AnalyzeArgs, json: bool, stop: &AtomicBool) -> CoreResult<()> {
    let (edges, sequencing) = effective_settings(cfg, args.level1, args.level2);
    let session = SessionBuilder::new()
        .with_edges(edges)
        .with_sequencing(sequencing)
        .apply_calibration(cfg.calibration.as_ref().map(Calibration::from))
        .build()?;

    let reader = open_input(args.input.as_deref())?;
    let mut sink = ConsoleSink::new(io::stdout().lock(), json);
    let outcome = run_stream(reader, session, &mut sink, Some(stop))?;
    let mut out = sink.into_inner()?;

    if outcome.interrupted {
        tracing::warn!(
            accepted = outcome.samples.len(),
            "interrupted; reporting on the samples collected so far"
        );
    }

    let written = match outcome.summarize() {
        Ok(summary) => {
            let report = Report {
                summary,
                resolution_s: outcome.resolution_s(),
            };
            if json {
                writeln!(out, "{}", report_json(&report, Some(&outcome)))
            } else {
                write!(out, "{report}")
            }
        }
        Err(e) => {
            // No statistics, no offset log.
            return write_insufficient(&mut out, &e, json)
                .and_then(|()| out.flush())
                .map_err(|e| AnalyzerError::Io(format!("write report: {e}")).into());
        }
    };
    written
        .and_then(|()| out.flush())
        .map_err(|e| AnalyzerError::Io(format!("write report: {e}")))?;

    let output = args.output.or_else(|| cfg.output.offsets.clone());
    if let Some(path) = output {
        save_offsets(&path, &outcome)?;
    }
    Ok(())
}

fn save_offsets(path: &Path, outcome: &SessionOutcome) -> CoreResult<()> {
    let file = File::create(path)
        .map_err(|e| AnalyzerError::Io(format!("create offset log {path:?}: {e}")))?;
    write_offset_log(BufWriter::new(file), &outcome.samples)
        .map_err(|e| AnalyzerError::Io(format!("write offset log {path:?}: {e}")))?;
    tracing::info!(path = %path.display(), samples = outcome.samples.len(), "offset log written");
    Ok(())
}

fn write_insufficient<W: Write>(out: &mut W, e: &InsufficientData, json: bool) -> io::Result<()> {
    tracing::info!(count = e.count, "statistics skipped");
    if json {
        let obj = json!({ "reason": "InsufficientData", "count": e.count, "message": e.to_string() });
        writeln!(out, "{obj}")
    } else {
        writeln!(out, "Not enough offsets for statistics")
    }
}

fn report_json(report: &Report, outcome: Option<&SessionOutcome>) -> serde_json::Value {
    let s = &report.summary;
    let mut obj = json!({
        "count": s.count,
        "mean_ns": to_ns(s.mean),
        "min_ns": to_ns(s.min),
        "max_ns": to_ns(s.max),
        "stddev_ns": to_ns(s.stddev),
        "resolution_ns": report.resolution_s.map(to_ns),
    });
    if let Some(o) = outcome {
        let d = &o.dropped;
        obj["triggers"] = json!(o.triggers);
        obj["interrupted"] = json!(o.interrupted);
        obj["dropped"] = json!({
            "missing_timestamp": d.missing_timestamp,
            "missing_waveform": d.missing_waveform,
            "bad_waveform": d.bad_waveform,
            "uncalibrated": d.uncalibrated,
            "short_waveform": d.short_waveform,
            "missing_edge": d.missing_edge,
            "too_many_edges": d.too_many_edges,
            "incomplete": d.incomplete,
            "total": d.total(),
        });
    }
    obj
}

/// Statistics over a saved offset log. The log carries no resolution.
pub fn run_stats(log: &Path, json: bool) -> CoreResult<()> {
    let rows = ppsdiff_config::load_offset_log(log)?;
    let offsets: Vec<f64> = rows.iter().map(|r| r.offset_ns / NANOS_PER_SEC).collect();
    tracing::debug!(path = %log.display(), rows = rows.len(), "offset log loaded");

    let mut out = io::stdout().lock();
    let written = match summarize_offsets(&offsets) {
        Ok(summary) => {
            let report = Report {
                summary,
                resolution_s: None,
            };
            if json {
                writeln!(out, "{}", report_json(&report, None))
            } else {
                write!(out, "{report}")
            }
        }
        Err(e) => write_insufficient(&mut out, &e, json),
    };
    written
        .and_then(|()| out.flush())
        .map_err(|e| AnalyzerError::Io(format!("write report: {e}")).into())
}

/// Build a session from the config to surface every validation error, then
/// print what a run would use.
pub fn check_config(cfg: &Config, source: Option<&Path>, json: bool) -> CoreResult<()> {
    let (edges, sequencing) = effective_settings(cfg, None, None);
    let session = SessionBuilder::new()
        .with_edges(edges)
        .with_sequencing(sequencing)
        .apply_calibration(cfg.calibration.as_ref().map(Calibration::from))
        .build()?;
    let edges = *session.edges();
    let sequencing = *session.sequencing();

    let source = source.map_or_else(|| "<defaults>".to_string(), |p| p.display().to_string());
    let offsets = cfg.output.offsets.as_ref().map(|p| p.display().to_string());
    let mut out = io::stdout().lock();
    let res = if json {
        let obj = json!({
            "ok": true,
            "source": source,
            "level1": edges.level1,
            "level2": edges.level2,
            "max_gap_s": sequencing.max_gap_s,
            "min_gap_s": sequencing.min_gap_s,
            "offsets": offsets,
            "calibration_seed": cfg.calibration.is_some(),
        });
        writeln!(out, "{obj}")
    } else {
        writeln!(out, "Config OK ({source})")
            .and_then(|()| writeln!(out, "level1:    {} V", edges.level1))
            .and_then(|()| writeln!(out, "level2:    {} V", edges.level2))
            .and_then(|()| writeln!(out, "max_gap_s: {} s", sequencing.max_gap_s))
            .and_then(|()| writeln!(out, "min_gap_s: {} s", sequencing.min_gap_s))
            .and_then(|()| {
                writeln!(out, "offsets:   {}", offsets.as_deref().unwrap_or("<none>"))
            })
            .and_then(|()| {
                let seeded = if cfg.calibration.is_some() { "seeded" } else { "from stream" };
                writeln!(out, "calibration: {seeded}")
            })
    };
    res.map_err(|e| AnalyzerError::Io(format!("write config summary: {e}")).into())
}
