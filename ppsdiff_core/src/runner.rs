//! Drive a `CaptureSession` from a line-oriented reader.

use std::io::BufRead;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::diagnostics::DiagnosticSink;
use crate::error::{AnalyzerError, Result};
use crate::session::{CaptureSession, SessionOutcome};

/// Consume `reader` to end of input, feeding every line into `session`.
///
/// `stop` is checked between lines; once it is set the stream is abandoned
/// and the outcome is returned with `interrupted = true`. Lines that are not
/// valid UTF-8 are decoded lossily and end up as unknown tags.
pub fn run_stream<R, S>(
    mut reader: R,
    mut session: CaptureSession,
    sink: &mut S,
    stop: Option<&AtomicBool>,
) -> Result<SessionOutcome>
where
    R: BufRead,
    S: DiagnosticSink + ?Sized,
{
    let mut buf = Vec::with_capacity(4096);
    let mut lines: u64 = 0;
    let mut interrupted = false;
    loop {
        if stop.is_some_and(|s| s.load(Ordering::Relaxed)) {
            interrupted = true;
            tracing::info!(lines, "stop requested; ending capture early");
            break;
        }
        buf.clear();
        let n = reader
            .read_until(b'\n', &mut buf)
            .map_err(|e| AnalyzerError::Io(format!("read capture line {}: {e}", lines + 1)))?;
        if n == 0 {
            break;
        }
        lines += 1;
        let line = String::from_utf8_lossy(&buf);
        session.feed_line(line.trim_end_matches(['\n', '\r']), sink);
    }

    let mut outcome = session.finish();
    outcome.interrupted = interrupted;
    tracing::info!(
        lines,
        triggers = outcome.triggers,
        accepted = outcome.samples.len(),
        dropped = outcome.dropped.total(),
        "capture stream consumed"
    );
    Ok(outcome)
}
