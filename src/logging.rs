//! Logging initialization
//!
//! One subscriber with two layers: human-readable output on stdout and a
//! plain-text file under the configured log directory. The file layer uses
//! a non-blocking writer; the returned guard must stay alive for the whole
//! process or buffered lines are lost on exit.

use crate::config::LoggingConfig;
use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Name of the log file inside the configured log directory
pub const LOG_FILE_NAME: &str = "postdex.log";

/// Install the global subscriber and return the file writer guard.
///
/// The level comes from the config, bumped by `-v` flags; RUST_LOG, when
/// set, overrides both.
pub fn init(config: &LoggingConfig, verbosity: u8) -> Result<WorkerGuard> {
    std::fs::create_dir_all(&config.dir).with_context(|| {
        format!("Failed to create log directory '{}'", config.dir.display())
    })?;

    let level = match verbosity {
        0 => config.level.as_str(),
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let file_appender = tracing_appender::rolling::never(&config.dir, LOG_FILE_NAME);
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(file_writer),
        )
        .with(filter)
        .init();

    Ok(guard)
}
