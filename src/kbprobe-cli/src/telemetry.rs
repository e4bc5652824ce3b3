//! Tracing setup for the kbprobe binary
//!
//! Provides:
//! - Human-readable progress lines on stdout, or on stderr when stdout carries
//!   machine-readable output
//! - Optional JSON log file with size-based and daily rotation (10MB per file)

use anyhow::Result;
use rolling_file::{RollingConditionBasic, RollingFileAppender};
use std::io::IsTerminal;
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

const DEFAULT_FILTER: &str = "kbprobe=info,kbprobe_core=info";

/// Initialize logging; with `log_dir`, also write JSON logs there.
///
/// With `console_on_stderr` the console lines go to stderr so stdout stays
/// parseable. Colors are only used when the chosen stream is a terminal.
///
/// Returns a guard that must be kept alive to ensure file logs are flushed
pub fn init_telemetry(
    log_dir: Option<&Path>,
    console_on_stderr: bool,
) -> Result<Option<WorkerGuard>> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let (writer, ansi) = if console_on_stderr {
        (BoxMakeWriter::new(std::io::stderr), std::io::stderr().is_terminal())
    } else {
        (BoxMakeWriter::new(std::io::stdout), std::io::stdout().is_terminal())
    };

    let console_layer = fmt::layer()
        .with_writer(writer)
        .with_ansi(ansi)
        .with_target(false)
        .without_time();

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)?;

            // Format: kbprobe.log.YYYY-MM-DD, rotated daily or at 10MB
            let file_appender = RollingFileAppender::new(
                dir.join("kbprobe.log"),
                RollingConditionBasic::new()
                    .daily()
                    .max_size(10 * 1024 * 1024),
                9,
            )?;
            let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);

            let layer = fmt::layer()
                .json()
                .with_writer(non_blocking_file)
                .with_target(true)
                .with_thread_ids(true)
                .boxed();
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(console_layer)
        .try_init()?;

    if let Some(dir) = log_dir {
        tracing::debug!("File logging enabled in {:?}", dir);
    }

    Ok(guard)
}
