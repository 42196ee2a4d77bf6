//! Human-readable error descriptions, structured JSON errors and exit codes.

use ppsdiff_core::error::{AnalyzerError, BuildError};

/// Map an eyre::Report to a human-readable explanation with likely causes and fix hints.
pub fn humanize(err: &eyre::Report) -> String {
    // Typed matches first
    if let Some(BuildError::InvalidConfig(msg)) = err.downcast_ref::<BuildError>() {
        return format!(
            "What happened: Invalid configuration ({msg}).\nLikely causes: Out-of-range values in the TOML or on the command line.\nHow to fix: Check [edges], [sequencing] and [calibration], or the --level1/--level2 flags, then rerun."
        );
    }

    if let Some(ae) = err.downcast_ref::<AnalyzerError>() {
        return match ae {
            AnalyzerError::Io(msg) => format!(
                "What happened: I/O failure ({msg}).\nLikely causes: Missing input file, closed pipe, or an unwritable output path.\nHow to fix: Check the paths given to analyze/--output and that the capture process is still running."
            ),
            AnalyzerError::Config(msg) => format!(
                "What happened: Could not load the configuration ({msg}).\nLikely causes: Wrong --config path, TOML syntax error, or a value failing validation.\nHow to fix: Run `ppsdiff --config <FILE> check-config` and fix the reported key."
            ),
        };
    }

    // String-based heuristics for errors coming from the config crate
    let msg = err.to_string();
    let lower = msg.to_ascii_lowercase();

    if lower.contains("open offset log") {
        return format!(
            "What happened: The offset log could not be opened.\nLikely causes: Wrong path or missing read permission.\nHow to fix: Pass the file written by `ppsdiff analyze --output`. Original: {msg}"
        );
    }

    if lower.contains("invalid offset log line") {
        return format!(
            "What happened: The offset log is malformed.\nLikely causes: The file was edited by hand or is not an offset log.\nHow to fix: Each line must be `<timestamp> <signed offset ns>`. Original: {msg}"
        );
    }

    if lower.contains("invalid log level") {
        return format!(
            "What happened: The log level was not understood.\nLikely causes: Typo in --log-level, [logging].level or RUST_LOG.\nHow to fix: Use one of error, warn, info, debug, trace. Original: {msg}"
        );
    }

    // Generic fallback
    let mut cause = String::new();
    if let Some(src) = err.source() {
        cause = format!(" Cause: {src}");
    }
    format!(
        "Something went wrong.{cause}\nHow to fix: Re-run with --log-level=debug for details. Original: {msg}"
    )
}

/// Stable exit codes: 3 for I/O failures and unusable offset logs, 4 for
/// configuration problems, 1 otherwise.
/// Clap exits with 2 on usage errors before any of this runs.
pub fn exit_code_for_error(err: &eyre::Report) -> i32 {
    if err.downcast_ref::<BuildError>().is_some() {
        return 4;
    }
    if let Some(ae) = err.downcast_ref::<AnalyzerError>() {
        return match ae {
            AnalyzerError::Io(_) => 3,
            AnalyzerError::Config(_) => 4,
        };
    }
    let lower = err.to_string().to_ascii_lowercase();
    if lower.contains("open offset log") || lower.contains("invalid offset log line") {
        return 3;
    }
    if lower.contains("invalid log level") {
        return 4;
    }
    1
}

/// Stable reason name used in JSON errors.
pub fn reason_name(err: &eyre::Report) -> &'static str {
    if err.downcast_ref::<BuildError>().is_some() {
        return "InvalidConfig";
    }
    match err.downcast_ref::<AnalyzerError>() {
        Some(AnalyzerError::Io(_)) => "Io",
        Some(AnalyzerError::Config(_)) => "Config",
        None => "Error",
    }
}

/// Structured JSON for errors when --json is enabled.
pub fn format_error_json(err: &eyre::Report) -> String {
    use serde_json::json;
    json!({
        "reason": reason_name(err),
        "exit_code": exit_code_for_error(err),
        "message": humanize(err),
    })
    .to_string()
}
