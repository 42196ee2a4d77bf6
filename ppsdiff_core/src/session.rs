//! Stateful consumer of the capture stream.
//!
//! A [`CaptureSession`] owns the live calibration, the trigger currently being
//! captured and the accepted offset samples. Lines are pushed in one at a time;
//! a `WAVE2:` line completes the in-flight trigger, which is then either
//! accepted as an [`OffsetSample`] or dropped with a [`Diagnostic`].

use crate::builder::SessionBuilder;
use crate::calibration::{Calibration, Channel};
use crate::config::{EdgeCfg, SequencingCfg};
use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::directive::Directive;
use crate::edges::{EdgeFault, find_rising_edges, sole_edge};
use crate::error::{DecodeError, InsufficientData};
use crate::stats::{StatisticsSummary, summarize};
use crate::util::to_ns;
use crate::waveform::decode_with;

/// One accepted measurement: channel 2 edge time minus channel 1 edge time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OffsetSample {
    /// Trigger timestamp as reported by the capture side (seconds).
    pub timestamp: f64,
    /// Offset in seconds.
    pub offset_s: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
enum WaveSlot {
    #[default]
    Unset,
    Decoded(Vec<f64>),
    Failed(DecodeError),
}

/// The trigger between its `TRIGGER:` line and its `WAVE2:` line.
///
/// Replaced wholesale by every new `TRIGGER:`; never carried into the next cycle.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct TriggerEvent {
    /// 1-based trigger counter value at the time the trigger started.
    number: u64,
    timestamp: Option<f64>,
    wave1: WaveSlot,
    wave2: WaveSlot,
}

impl TriggerEvent {
    fn new(number: u64, timestamp: Option<f64>) -> Self {
        Self {
            number,
            timestamp,
            wave1: WaveSlot::Unset,
            wave2: WaveSlot::Unset,
        }
    }

    fn slot_mut(&mut self, channel: Channel) -> &mut WaveSlot {
        match channel {
            Channel::One => &mut self.wave1,
            Channel::Two => &mut self.wave2,
        }
    }
}

/// Dropped trigger counts, by reason.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DropCounts {
    pub missing_timestamp: u64,
    pub missing_waveform: u64,
    pub bad_waveform: u64,
    pub uncalibrated: u64,
    pub short_waveform: u64,
    pub missing_edge: u64,
    pub too_many_edges: u64,
    /// Started but never completed by a `WAVE2:` line.
    pub incomplete: u64,
}

impl DropCounts {
    pub fn total(&self) -> u64 {
        self.missing_timestamp
            + self.missing_waveform
            + self.bad_waveform
            + self.uncalibrated
            + self.short_waveform
            + self.missing_edge
            + self.too_many_edges
            + self.incomplete
    }

    fn record(&mut self, diagnostic: &Diagnostic) {
        let counter = match diagnostic {
            Diagnostic::MissingTimestamp { .. } => &mut self.missing_timestamp,
            Diagnostic::MissingWaveform { .. } => &mut self.missing_waveform,
            Diagnostic::BadWaveform { .. } => &mut self.bad_waveform,
            Diagnostic::Uncalibrated { .. } => &mut self.uncalibrated,
            Diagnostic::ShortWaveform { .. } => &mut self.short_waveform,
            Diagnostic::MissingEdge { .. } => &mut self.missing_edge,
            Diagnostic::TooManyEdges { .. } => &mut self.too_many_edges,
            _ => return,
        };
        *counter += 1;
    }
}

/// Everything a finished session hands to the reporting phase.
#[derive(Debug, Clone)]
pub struct SessionOutcome {
    /// Accepted samples in stream order.
    pub samples: Vec<OffsetSample>,
    /// Number of `TRIGGER:` lines seen.
    pub triggers: u64,
    pub dropped: DropCounts,
    /// Calibration as it stood at end of stream.
    pub calibration: Calibration,
    /// The stream was not read to the end because a stop was requested.
    pub interrupted: bool,
}

impl SessionOutcome {
    /// Sample spacing at end of stream, if the stream reported one.
    pub fn resolution_s(&self) -> Option<f64> {
        self.calibration.x_increment
    }

    pub fn summarize(&self) -> Result<StatisticsSummary, InsufficientData> {
        summarize(&self.samples)
    }
}

#[derive(Debug, Clone, Default)]
pub struct CaptureSession {
    edges: EdgeCfg,
    sequencing: SequencingCfg,
    calibration: Calibration,
    pending: Option<TriggerEvent>,
    last_accepted: Option<f64>,
    triggers: u64,
    samples: Vec<OffsetSample>,
    dropped: DropCounts,
}

impl CaptureSession {
    pub fn new(edges: EdgeCfg, sequencing: SequencingCfg, calibration: Calibration) -> Self {
        Self {
            edges,
            sequencing,
            calibration,
            ..Self::default()
        }
    }

    pub fn builder() -> SessionBuilder {
        SessionBuilder::new()
    }

    pub fn edges(&self) -> &EdgeCfg {
        &self.edges
    }

    pub fn sequencing(&self) -> &SequencingCfg {
        &self.sequencing
    }

    pub fn calibration(&self) -> &Calibration {
        &self.calibration
    }

    /// Accepted samples so far, in stream order.
    pub fn samples(&self) -> &[OffsetSample] {
        &self.samples
    }

    /// Timestamp of the most recently accepted trigger.
    pub fn last_accepted(&self) -> Option<f64> {
        self.last_accepted
    }

    /// Parse and apply one line of the capture stream.
    pub fn feed_line<S: DiagnosticSink + ?Sized>(&mut self, line: &str, sink: &mut S) {
        match Directive::parse(line) {
            Ok(directive) => self.apply(directive, sink),
            Err(e) => {
                tracing::debug!(error = %e, "malformed line");
                sink.report(Diagnostic::Malformed(e));
            }
        }
    }

    /// Apply one already parsed directive.
    pub fn apply<S: DiagnosticSink + ?Sized>(&mut self, directive: Directive<'_>, sink: &mut S) {
        match directive {
            Directive::Blank | Directive::Passthrough => {}
            Directive::Depth(depth) => self.calibration.set_depth(depth),
            Directive::Axis(field, value) => self.calibration.set_axis(field, value),
            Directive::Vertical(channel, field, value) => {
                self.calibration.set_vertical(channel, field, value)
            }
            Directive::Trigger { timestamp } => self.start_trigger(timestamp),
            Directive::Wave { channel, payload } => {
                self.store_wave(channel, payload);
                if channel == Channel::Two {
                    self.finalize(sink);
                }
            }
            Directive::Unknown(tag) => sink.report(Diagnostic::UnknownTag {
                tag: tag.to_string(),
            }),
        }
    }

    /// End of stream. A trigger still waiting for its `WAVE2:` is discarded.
    pub fn finish(mut self) -> SessionOutcome {
        if let Some(event) = self.pending.take() {
            tracing::debug!(
                trigger = event.number,
                timestamp = ?event.timestamp,
                "discarding incomplete trigger at end of stream"
            );
            self.dropped.incomplete += 1;
        }
        SessionOutcome {
            samples: self.samples,
            triggers: self.triggers,
            dropped: self.dropped,
            calibration: self.calibration,
            interrupted: false,
        }
    }

    fn start_trigger(&mut self, timestamp: Option<f64>) {
        self.triggers += 1;
        let next = TriggerEvent::new(self.triggers, timestamp);
        if let Some(prev) = self.pending.replace(next) {
            tracing::debug!(
                trigger = prev.number,
                timestamp = ?prev.timestamp,
                "trigger superseded before its WAVE2"
            );
            self.dropped.incomplete += 1;
        }
        tracing::trace!(trigger = self.triggers, ?timestamp, "trigger start");
    }

    fn store_wave(&mut self, channel: Channel, payload: Option<&str>) {
        if self.pending.is_none() {
            // WAVE2 without a trigger is reported by finalize().
            tracing::debug!(%channel, "waveform outside of a trigger");
            return;
        }
        // A value-less WAVE line leaves whatever the slot already holds.
        let Some(hex) = payload else {
            return;
        };
        let slot = match self.calibration.vertical(channel) {
            Ok(scale) => match decode_with(hex, &scale) {
                Ok(samples) => WaveSlot::Decoded(samples),
                Err(e) => WaveSlot::Failed(e),
            },
            Err(e) => WaveSlot::Failed(e.into()),
        };
        if let Some(event) = self.pending.as_mut() {
            *event.slot_mut(channel) = slot;
        }
    }

    fn finalize<S: DiagnosticSink + ?Sized>(&mut self, sink: &mut S) {
        let result = match self.pending.take() {
            Some(event) => self.evaluate(event, sink),
            None => Err(Diagnostic::MissingTimestamp {
                trigger: self.triggers,
            }),
        };
        match result {
            Ok(sample) => {
                tracing::debug!(
                    timestamp = sample.timestamp,
                    offset_ns = to_ns(sample.offset_s),
                    "offset accepted"
                );
                self.last_accepted = Some(sample.timestamp);
                self.samples.push(sample);
            }
            Err(diagnostic) => {
                tracing::debug!(kind = diagnostic.kind(), "trigger dropped: {diagnostic}");
                self.dropped.record(&diagnostic);
                sink.report(diagnostic);
            }
        }
    }

    /// Validity pipeline for a completed trigger. Sequencing diagnostics are
    /// advisory and go straight to `sink`; the first hard failure is returned.
    fn evaluate<S: DiagnosticSink + ?Sized>(
        &self,
        event: TriggerEvent,
        sink: &mut S,
    ) -> Result<OffsetSample, Diagnostic> {
        let trigger = event.number;
        let Some(timestamp) = event.timestamp else {
            return Err(Diagnostic::MissingTimestamp { trigger });
        };

        if let Some(last) = self.last_accepted {
            let gap = timestamp - last;
            if gap > self.sequencing.max_gap_s {
                sink.report(Diagnostic::MissingTrigger { last, timestamp });
            }
            if gap < self.sequencing.min_gap_s {
                sink.report(Diagnostic::ExtraTrigger { timestamp, trigger });
            }
        }

        let (wave1, wave2) = match (event.wave1, event.wave2) {
            (WaveSlot::Unset, _) | (_, WaveSlot::Unset) => {
                return Err(Diagnostic::MissingWaveform { timestamp, trigger });
            }
            (WaveSlot::Failed(error), _) => {
                return Err(Diagnostic::BadWaveform {
                    timestamp,
                    trigger,
                    channel: Channel::One,
                    error,
                });
            }
            (_, WaveSlot::Failed(error)) => {
                return Err(Diagnostic::BadWaveform {
                    timestamp,
                    trigger,
                    channel: Channel::Two,
                    error,
                });
            }
            (WaveSlot::Decoded(w1), WaveSlot::Decoded(w2)) => (w1, w2),
        };

        let uncalibrated = |e: crate::error::CalibrationUnset| Diagnostic::Uncalibrated {
            timestamp,
            trigger,
            field: e.0,
        };

        let depth = self.calibration.depth().map_err(uncalibrated)?;
        for (channel, wave) in [(Channel::One, &wave1), (Channel::Two, &wave2)] {
            if wave.len() != depth {
                return Err(Diagnostic::ShortWaveform {
                    timestamp,
                    trigger,
                    channel,
                    len: wave.len(),
                    depth,
                });
            }
        }

        let edges1 = find_rising_edges(&wave1, self.edges.level(Channel::One));
        let edges2 = find_rising_edges(&wave2, self.edges.level(Channel::Two));
        let (edge1, edge2) = match (sole_edge(&edges1), sole_edge(&edges2)) {
            (Ok(e1), Ok(e2)) => (e1, e2),
            (Err(EdgeFault::Missing), _) | (_, Err(EdgeFault::Missing)) => {
                return Err(Diagnostic::MissingEdge { timestamp, trigger });
            }
            _ => return Err(Diagnostic::TooManyEdges { timestamp, trigger }),
        };

        let x_increment = self.calibration.x_increment().map_err(uncalibrated)?;
        Ok(OffsetSample {
            timestamp,
            offset_s: x_increment * (edge2 - edge1),
        })
    }
}
