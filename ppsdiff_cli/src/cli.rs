//! CLI argument definitions and shared statics.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::OnceLock;

pub static FILE_GUARD: OnceLock<tracing_appender::non_blocking::WorkerGuard> = OnceLock::new();
/// Whether the user asked for JSON output (controls structured error output).
pub static JSON_MODE: OnceLock<bool> = OnceLock::new();

#[derive(Parser, Debug)]
#[command(
    name = "ppsdiff",
    version,
    about = "Timing offset between two PPS signals captured by an oscilloscope"
)]
pub struct Cli {
    /// Path to config TOML (optional; built-in defaults otherwise)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Emit report, diagnostics and errors as JSON lines
    #[arg(long, action = ArgAction::SetTrue)]
    pub json: bool,

    /// Console log level (error|warn|info|debug|trace). Default: [logging].level, then warn
    #[arg(long = "log-level", value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Command to execute
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Analyze a capture stream and print offset statistics
    Analyze {
        /// Edge detection voltage for the first channel (default 1.0 V)
        #[arg(short = '1', long, value_name = "VOLTS", allow_negative_numbers = true)]
        level1: Option<f64>,
        /// Edge detection voltage for the second channel (default 1.0 V)
        #[arg(short = '2', long, value_name = "VOLTS", allow_negative_numbers = true)]
        level2: Option<f64>,
        /// Save per-sample offsets to FILE
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
        /// Capture stream to read; standard input when omitted or "-"
        #[arg(value_name = "INPUT")]
        input: Option<PathBuf>,
    },
    /// Recompute statistics from a saved offset log
    Stats {
        /// Offset log written by `analyze --output`
        #[arg(value_name = "LOG")]
        log: PathBuf,
    },
    /// Validate the configuration and print the effective settings
    CheckConfig,
}
