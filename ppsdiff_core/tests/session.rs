use ppsdiff_core::calibration::{CalibrationField, Channel};
use ppsdiff_core::error::{CalibrationUnset, DecodeError};
use ppsdiff_core::{CaptureSession, Diagnostic, SessionOutcome};
use rstest::rstest;

// Identity vertical scale: voltage == byte value. 8 samples per waveform, 1 ns apart.
const CALIBRATION: &[&str] = &[
    "IDN: RIGOL TECHNOLOGIES,DS1054Z",
    "DEPTH: 8",
    "XINCREMENT: 1e-09",
    "XORIGIN: -4e-09",
    "XREFERENCE: 0",
    "Y1INCREMENT: 1",
    "Y1ORIGIN: 0",
    "Y1REFERENCE: 0",
    "Y2INCREMENT: 1",
    "Y2ORIGIN: 0",
    "Y2REFERENCE: 0",
];

/// Single rising edge through 1.0 V at sample 2.5.
const EDGE_AT_2_5: &str = "0000000202020202";
/// Single rising edge through 1.0 V at sample 3.0.
const EDGE_AT_3_0: &str = "0000000103030303";
const FLAT_LOW: &str = "0000000000000000";
const TWO_EDGES: &str = "0002000200020002";
const SEVEN_SAMPLES: &str = "00000002020202";

fn run(lines: &[&str]) -> (SessionOutcome, Vec<Diagnostic>) {
    let mut session = CaptureSession::default();
    let mut diags = Vec::new();
    for line in CALIBRATION.iter().chain(lines) {
        session.feed_line(line, &mut diags);
    }
    (session.finish(), diags)
}

fn trigger(ts: &str, wave1: &str, wave2: &str) -> [String; 3] {
    [
        format!("TRIGGER: {ts} waited 0.35"),
        format!("WAVE1: {wave1}"),
        format!("WAVE2: {wave2}"),
    ]
}

fn triggers(spec: &[(&str, &str, &str)]) -> Vec<String> {
    spec.iter()
        .flat_map(|(ts, w1, w2)| trigger(ts, w1, w2))
        .collect()
}

fn refs(lines: &[String]) -> Vec<&str> {
    lines.iter().map(String::as_str).collect()
}

#[test]
fn single_trigger_yields_half_nanosecond_offset() {
    let lines = triggers(&[("1.0", EDGE_AT_2_5, EDGE_AT_3_0)]);
    let (outcome, diags) = run(&refs(&lines));
    assert!(diags.is_empty(), "unexpected diagnostics: {diags:?}");
    assert_eq!(outcome.samples.len(), 1);
    assert_eq!(outcome.samples[0].timestamp, 1.0);
    assert!((outcome.samples[0].offset_s - 0.5e-9).abs() < 1e-18);
    assert_eq!(outcome.triggers, 1);
    assert_eq!(outcome.resolution_s(), Some(1e-9));
}

#[test]
fn regular_one_second_triggers_are_all_accepted_quietly() {
    let lines = triggers(&[
        ("0.0", EDGE_AT_2_5, EDGE_AT_3_0),
        ("1.0", EDGE_AT_3_0, EDGE_AT_2_5),
        ("2.0", EDGE_AT_2_5, EDGE_AT_2_5),
    ]);
    let (outcome, diags) = run(&refs(&lines));
    assert!(diags.is_empty(), "unexpected diagnostics: {diags:?}");
    let ts: Vec<f64> = outcome.samples.iter().map(|s| s.timestamp).collect();
    assert_eq!(ts, vec![0.0, 1.0, 2.0]);
    assert!((outcome.samples[1].offset_s + 0.5e-9).abs() < 1e-18);
    assert_eq!(outcome.samples[2].offset_s, 0.0);
}

#[test]
fn gap_is_reported_but_both_triggers_count() {
    let lines = triggers(&[
        ("0.0", EDGE_AT_2_5, EDGE_AT_3_0),
        ("3.0", EDGE_AT_2_5, EDGE_AT_3_0),
    ]);
    let (outcome, diags) = run(&refs(&lines));
    assert_eq!(
        diags,
        vec![Diagnostic::MissingTrigger {
            last: 0.0,
            timestamp: 3.0
        }]
    );
    assert_eq!(diags[0].to_string(), "missing trigger between 0.0 and 3.0");
    assert_eq!(outcome.samples.len(), 2);
}

#[test]
fn close_triggers_are_reported_as_extra_but_accepted() {
    let lines = triggers(&[
        ("10.0", EDGE_AT_2_5, EDGE_AT_3_0),
        ("10.25", EDGE_AT_2_5, EDGE_AT_3_0),
    ]);
    let (outcome, diags) = run(&refs(&lines));
    assert_eq!(
        diags,
        vec![Diagnostic::ExtraTrigger {
            timestamp: 10.25,
            trigger: 2
        }]
    );
    assert_eq!(outcome.samples.len(), 2);
}

#[test]
fn dropped_trigger_does_not_advance_last_accepted() {
    let lines = triggers(&[
        ("0.0", EDGE_AT_2_5, EDGE_AT_3_0),
        ("1.0", "", EDGE_AT_3_0),
        ("2.0", EDGE_AT_2_5, EDGE_AT_3_0),
    ]);
    let (outcome, diags) = run(&refs(&lines));
    assert_eq!(
        diags,
        vec![
            Diagnostic::MissingWaveform {
                timestamp: 1.0,
                trigger: 2
            },
            Diagnostic::MissingTrigger {
                last: 0.0,
                timestamp: 2.0
            },
        ]
    );
    assert_eq!(outcome.samples.len(), 2);
    assert_eq!(outcome.dropped.missing_waveform, 1);
}

#[test]
fn last_accepted_tracks_only_accepted_triggers() {
    let mut session = CaptureSession::default();
    let mut diags = Vec::new();
    let lines = triggers(&[
        ("0.0", EDGE_AT_2_5, EDGE_AT_3_0),
        ("1.0", FLAT_LOW, EDGE_AT_3_0),
    ]);
    for line in CALIBRATION.iter().copied().chain(refs(&lines)) {
        session.feed_line(line, &mut diags);
    }
    assert_eq!(session.last_accepted(), Some(0.0));

    for line in trigger("2.0", EDGE_AT_2_5, EDGE_AT_3_0) {
        session.feed_line(&line, &mut diags);
    }
    assert_eq!(session.last_accepted(), Some(2.0));
    assert_eq!(session.samples().len(), 2);
}

#[test]
fn empty_wave_line_keeps_earlier_payload() {
    let lines = [
        "TRIGGER: 1.0".to_string(),
        format!("WAVE1: {EDGE_AT_2_5}"),
        "WAVE1:".to_string(),
        format!("WAVE2: {EDGE_AT_3_0}"),
    ];
    let (outcome, diags) = run(&refs(&lines));
    assert!(diags.is_empty(), "unexpected diagnostics: {diags:?}");
    assert_eq!(outcome.samples.len(), 1);
    assert!((outcome.samples[0].offset_s - 0.5e-9).abs() < 1e-18);
}

#[rstest]
#[case(SEVEN_SAMPLES, EDGE_AT_3_0, "short_waveform")]
#[case(EDGE_AT_2_5, SEVEN_SAMPLES, "short_waveform")]
#[case(FLAT_LOW, EDGE_AT_3_0, "missing_edge")]
#[case(EDGE_AT_2_5, FLAT_LOW, "missing_edge")]
#[case(TWO_EDGES, EDGE_AT_3_0, "too_many_edges")]
#[case(EDGE_AT_2_5, TWO_EDGES, "too_many_edges")]
// Missing edge wins over too many edges.
#[case(TWO_EDGES, FLAT_LOW, "missing_edge")]
#[case("00zz000202020202", EDGE_AT_3_0, "bad_waveform")]
#[case(EDGE_AT_2_5, "000", "bad_waveform")]
fn invalid_waveforms_drop_the_trigger(
    #[case] wave1: &str,
    #[case] wave2: &str,
    #[case] kind: &str,
) {
    let lines = triggers(&[("5.0", wave1, wave2)]);
    let (outcome, diags) = run(&refs(&lines));
    assert_eq!(diags.len(), 1, "diagnostics: {diags:?}");
    assert_eq!(diags[0].kind(), kind);
    assert!(diags[0].drops_trigger());
    assert!(outcome.samples.is_empty());
    assert_eq!(outcome.dropped.total(), 1);
}

#[test]
fn short_waveform_names_channel_and_lengths() {
    let lines = triggers(&[("5.0", EDGE_AT_2_5, SEVEN_SAMPLES)]);
    let (_, diags) = run(&refs(&lines));
    assert_eq!(
        diags[0].to_string(),
        "short waveform on channel 2 at 5.0 trigger #1 (7 of 8 samples)"
    );
}

#[test]
fn wave2_without_trigger_reports_missing_timestamp() {
    let mut lines = triggers(&[("1.0", EDGE_AT_2_5, EDGE_AT_3_0)]);
    lines.push(format!("WAVE1: {EDGE_AT_2_5}"));
    lines.push(format!("WAVE2: {EDGE_AT_3_0}"));
    let (outcome, diags) = run(&refs(&lines));
    assert_eq!(diags, vec![Diagnostic::MissingTimestamp { trigger: 1 }]);
    assert_eq!(
        diags[0].to_string(),
        "missing trigger timestamp after trigger #1"
    );
    assert_eq!(outcome.samples.len(), 1);
}

#[test]
fn unparsable_trigger_timestamp_is_missing() {
    let lines = triggers(&[("soon", EDGE_AT_2_5, EDGE_AT_3_0)]);
    let (outcome, diags) = run(&refs(&lines));
    assert_eq!(diags, vec![Diagnostic::MissingTimestamp { trigger: 1 }]);
    assert_eq!(outcome.dropped.missing_timestamp, 1);
}

#[test]
fn unknown_tags_are_reported_and_skipped() {
    let mut lines = vec!["VOLTAGE: 3.3".to_string()];
    lines.extend(triggers(&[("1.0", EDGE_AT_2_5, EDGE_AT_3_0)]));
    let (outcome, diags) = run(&refs(&lines));
    assert_eq!(
        diags,
        vec![Diagnostic::UnknownTag {
            tag: "VOLTAGE:".into()
        }]
    );
    assert_eq!(diags[0].to_string(), "unknown data VOLTAGE:");
    assert_eq!(outcome.samples.len(), 1);
}

#[test]
fn trailing_incomplete_trigger_is_dropped_silently() {
    let mut lines = triggers(&[("1.0", EDGE_AT_2_5, EDGE_AT_3_0)]);
    lines.push("TRIGGER: 2.0".into());
    lines.push(format!("WAVE1: {EDGE_AT_2_5}"));
    let (outcome, diags) = run(&refs(&lines));
    assert!(diags.is_empty());
    assert_eq!(outcome.samples.len(), 1);
    assert_eq!(outcome.triggers, 2);
    assert_eq!(outcome.dropped.incomplete, 1);
}

#[test]
fn new_trigger_replaces_unfinished_one() {
    let lines = [
        "TRIGGER: 1.0".to_string(),
        format!("WAVE1: {EDGE_AT_2_5}"),
        "TRIGGER: 2.0".to_string(),
        // WAVE1 of the superseded trigger must not leak into this one.
        format!("WAVE2: {EDGE_AT_3_0}"),
    ];
    let (outcome, diags) = run(&refs(&lines));
    assert_eq!(
        diags,
        vec![Diagnostic::MissingWaveform {
            timestamp: 2.0,
            trigger: 2
        }]
    );
    assert!(outcome.samples.is_empty());
    assert_eq!(outcome.dropped.incomplete, 1);
}

#[test]
fn recalibration_applies_to_later_triggers() {
    let mut lines = triggers(&[("1.0", EDGE_AT_2_5, EDGE_AT_3_0)]);
    lines.push("XINCREMENT: 2e-09".into());
    lines.extend(triggers(&[("2.0", EDGE_AT_2_5, EDGE_AT_3_0)]));
    let (outcome, _) = run(&refs(&lines));
    assert!((outcome.samples[0].offset_s - 0.5e-9).abs() < 1e-18);
    assert!((outcome.samples[1].offset_s - 1.0e-9).abs() < 1e-18);
    assert_eq!(outcome.resolution_s(), Some(2e-9));
}

#[test]
fn malformed_calibration_keeps_previous_value() {
    let mut lines = vec!["DEPTH: lots".to_string()];
    lines.extend(triggers(&[("1.0", EDGE_AT_2_5, EDGE_AT_3_0)]));
    let (outcome, diags) = run(&refs(&lines));
    assert_eq!(diags.len(), 1);
    assert_eq!(diags[0].kind(), "malformed");
    assert_eq!(outcome.calibration.depth, Some(8));
    assert_eq!(outcome.samples.len(), 1);
}

#[test]
fn missing_calibration_drops_with_field_name() {
    let mut session = CaptureSession::default();
    let mut diags = Vec::new();
    for line in ["TRIGGER: 1.0", "WAVE1: 00", "WAVE2: 00"] {
        session.feed_line(line, &mut diags);
    }
    assert_eq!(
        diags,
        vec![Diagnostic::BadWaveform {
            timestamp: 1.0,
            trigger: 1,
            channel: Channel::One,
            error: DecodeError::Calibration(CalibrationUnset(CalibrationField::Vertical(
                Channel::One,
                ppsdiff_core::calibration::VerticalField::Increment
            ))),
        }]
    );

    // Vertical scale present, depth still unknown.
    let mut session = CaptureSession::default();
    let mut diags = Vec::new();
    for line in [
        "Y1INCREMENT: 1",
        "Y1ORIGIN: 0",
        "Y1REFERENCE: 0",
        "Y2INCREMENT: 1",
        "Y2ORIGIN: 0",
        "Y2REFERENCE: 0",
        "TRIGGER: 1.0",
        "WAVE1: 0002",
        "WAVE2: 0002",
    ] {
        session.feed_line(line, &mut diags);
    }
    assert_eq!(
        diags,
        vec![Diagnostic::Uncalibrated {
            timestamp: 1.0,
            trigger: 1,
            field: CalibrationField::Depth,
        }]
    );
    assert_eq!(diags[0].to_string(), "DEPTH not set at 1.0 trigger #1");
}

#[test]
fn levels_are_per_channel() {
    // With level2 = 2.5 V the channel 2 edge of EDGE_AT_3_0 moves to 3.75.
    let mut session = CaptureSession::builder()
        .with_levels(1.0, 2.5)
        .build()
        .unwrap();
    let mut diags = Vec::new();
    let lines = triggers(&[("1.0", EDGE_AT_2_5, EDGE_AT_3_0)]);
    for line in CALIBRATION.iter().copied().chain(refs(&lines)) {
        session.feed_line(line, &mut diags);
    }
    assert!(diags.is_empty(), "{diags:?}");
    let offset = session.samples()[0].offset_s;
    assert!((offset - 1.25e-9).abs() < 1e-18, "offset {offset}");
}
