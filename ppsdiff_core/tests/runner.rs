use std::sync::atomic::AtomicBool;

use ppsdiff_core::{CaptureSession, Diagnostic, Report, run_stream, write_offset_log};

const CAPTURE: &str = "\
DEBUG: Sending *IDN?
IDN: RIGOL TECHNOLOGIES,DS1104Z,DS1ZA000000000,00.04.04.SP3
DEPTH: 8
XINCREMENT: 1e-09
XORIGIN: -4e-09
XREFERENCE: 0
Y1INCREMENT: 0.5
Y1ORIGIN: 0
Y1REFERENCE: 0
Y2INCREMENT: 0.5
Y2ORIGIN: 0
Y2REFERENCE: 0
TRIGGER: 1600000000.0 waited 0.40
WAVE1: 0000000404040404
WAVE2: 0000000206060606
TRIGGER: 1600000001.0 waited 0.95
WAVE1: 0000000206060606
WAVE2: 0000000404040404
TRIGGER: 1600000002.0 waited 0.95
WAVE1: 
WAVE2: 0000000404040404
TRIGGER: 1600000003.0 waited 0.95
WAVE1: 0000000404040404
WAVE2: 0000000404040404
TRIGGER: 1600000004.0 waited 0.95
";

#[test]
fn full_capture_produces_report_and_log() {
    let mut diags: Vec<Diagnostic> = Vec::new();
    let outcome = run_stream(
        CAPTURE.as_bytes(),
        CaptureSession::default(),
        &mut diags,
        None::<&AtomicBool>,
    )
    .unwrap();

    assert_eq!(
        diags.iter().map(ToString::to_string).collect::<Vec<_>>(),
        vec![
            "missing waveform at 1600000002.0 trigger #3".to_string(),
            "missing trigger between 1600000001.0 and 1600000003.0".to_string(),
        ]
    );
    assert_eq!(outcome.triggers, 5);
    assert_eq!(outcome.samples.len(), 3);
    assert_eq!(outcome.dropped.missing_waveform, 1);
    assert_eq!(outcome.dropped.incomplete, 1);

    let summary = outcome.summarize().unwrap();
    let report = Report {
        summary,
        resolution_s: outcome.resolution_s(),
    };
    let text = report.to_string();
    assert!(text.starts_with("Samples:         3\nResolution:    1.0 ns\n"));
    assert!(text.contains("Mean:         +0.0 ns"));
    assert!(text.contains("Min:          -0.5 ns"));
    assert!(text.contains("Max:          +0.5 ns"));
    assert!(text.contains("StdDev:        0.5 ns"));

    let mut log = Vec::new();
    write_offset_log(&mut log, &outcome.samples).unwrap();
    assert_eq!(
        String::from_utf8(log).unwrap(),
        "1600000000.0 +0.5\n1600000001.0 -0.5\n1600000003.0 +0.0\n"
    );
}

#[test]
fn single_sample_is_insufficient_for_statistics() {
    let capture = CAPTURE.lines().take(15).collect::<Vec<_>>().join("\n");
    let mut diags: Vec<Diagnostic> = Vec::new();
    let outcome =
        run_stream(capture.as_bytes(), CaptureSession::default(), &mut diags, None).unwrap();
    assert_eq!(outcome.samples.len(), 1);
    let err = outcome.summarize().unwrap_err();
    assert_eq!(err.count, 1);
}
