//! Tracing subscriber setup: console layer on stderr plus an optional JSON file layer.

use crate::cli::FILE_GUARD;
use eyre::eyre;
use std::path::Path;

/// Install the global subscriber. `RUST_LOG` wins over `level` when set.
pub fn init_tracing(json: bool, level: &str, logging: &ppsdiff_config::Logging) -> eyre::Result<()> {
    use tracing_subscriber::{EnvFilter, Layer, fmt, prelude::*};

    let filter = match EnvFilter::try_from_default_env() {
        Ok(f) => f,
        Err(_) => EnvFilter::try_new(level).map_err(|e| eyre!("invalid log level {level:?}: {e}"))?,
    };

    // Stdout carries the report and diagnostics; logs stay on stderr.
    let console = if json {
        fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .boxed()
    } else {
        fmt::layer()
            .with_target(false)
            .with_writer(std::io::stderr)
            .boxed()
    };

    let file = match logging.file.as_deref() {
        Some(path) => {
            let path = Path::new(path);
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            let name = path
                .file_name()
                .ok_or_else(|| eyre!("logging.file has no file name: {path:?}"))?;
            let appender = match logging.rotation.as_deref().unwrap_or("never") {
                "daily" => tracing_appender::rolling::daily(dir, name),
                "hourly" => tracing_appender::rolling::hourly(dir, name),
                _ => tracing_appender::rolling::never(dir, name),
            };
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let _ = FILE_GUARD.set(guard);
            Some(
                fmt::layer()
                    .json()
                    .with_ansi(false)
                    .with_writer(writer)
                    .boxed(),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(file)
        .try_init()
        .map_err(|e| eyre!("init tracing: {e}"))
}
