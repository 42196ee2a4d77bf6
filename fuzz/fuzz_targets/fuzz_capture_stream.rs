#![no_main]
use libfuzzer_sys::fuzz_target;
use ppsdiff_core::{CaptureSession, NullSink, run_stream};

fuzz_target!(|data: &[u8]| {
    // Arbitrary bytes must never panic the session; every trigger is either
    // accepted or accounted for.
    let Ok(outcome) = run_stream(data, CaptureSession::default(), &mut NullSink, None) else {
        return;
    };
    assert!(outcome.samples.len() as u64 + outcome.dropped.total() <= outcome.triggers + count_wave2(data));
    let _ = outcome.summarize();
});

fn count_wave2(data: &[u8]) -> u64 {
    data.split(|b| *b == b'\n')
        .filter(|l| String::from_utf8_lossy(l).split_whitespace().next() == Some("WAVE2:"))
        .count() as u64
}
