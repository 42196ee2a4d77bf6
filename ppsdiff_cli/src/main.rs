#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
//! `ppsdiff`: measure the offset between two PPS signals from a scope capture stream.

mod analyze;
mod cli;
mod error_fmt;
mod logging;

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use clap::Parser;
use cli::{Cli, Commands, JSON_MODE};
use ppsdiff_config::Config;
use ppsdiff_core::error::AnalyzerError;

fn main() {
    let _ = color_eyre::install();
    // Clap prints usage and exits with 2 on bad arguments.
    let cli = Cli::parse();
    let _ = JSON_MODE.set(cli.json);

    if let Err(e) = run(cli) {
        if JSON_MODE.get().copied().unwrap_or(false) {
            eprintln!("{}", error_fmt::format_error_json(&e));
        } else {
            eprintln!("{}", error_fmt::humanize(&e));
        }
        tracing::debug!(error = ?e, "run failed");
        std::process::exit(error_fmt::exit_code_for_error(&e));
    }
}

fn load_config(path: Option<&Path>) -> eyre::Result<Config> {
    match path {
        Some(p) => ppsdiff_config::load_config(p)
            .map_err(|e| AnalyzerError::Config(e.to_string()).into()),
        None => Ok(Config::default()),
    }
}

fn run(cli: Cli) -> eyre::Result<()> {
    let cfg = load_config(cli.config.as_deref())?;
    let level = cli
        .log_level
        .as_deref()
        .or(cfg.logging.level.as_deref())
        .unwrap_or("warn");
    logging::init_tracing(cli.json, level, &cfg.logging)?;
    tracing::debug!(config = ?cli.config, level, "starting");

    match cli.cmd {
        Commands::Analyze {
            level1,
            level2,
            output,
            input,
        } => {
            let stop = Arc::new(AtomicBool::new(false));
            let flag = Arc::clone(&stop);
            // Checked between lines; a blocked read finishes its line first.
            if let Err(e) = ctrlc::set_handler(move || flag.store(true, Ordering::Relaxed)) {
                tracing::warn!(error = %e, "failed to install Ctrl-C handler");
            }
            let args = analyze::AnalyzeArgs {
                level1,
                level2,
                output,
                input,
            };
            analyze::run_analyze(&cfg, args, cli.json, &stop)
        }
        Commands::Stats { log } => analyze::run_stats(&log, cli.json),
        Commands::CheckConfig => analyze::check_config(&cfg, cli.config.as_deref(), cli.json),
    }
}
