//! Tracing setup: stdout plus a daily-rotated file under the log directory.

use std::sync::OnceLock;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::{expand_path, LoggingSettings};

static INIT: OnceLock<()> = OnceLock::new();

/// Install the global subscriber. `MENUDB_LOG` overrides the configured
/// filter. Returns the file writer guard; keep it alive for the life of the
/// process. Later calls are no-ops and return `None`.
pub fn init_logging(settings: &LoggingSettings) -> anyhow::Result<Option<WorkerGuard>> {
    if INIT.get().is_some() {
        return Ok(None);
    }

    let dir = expand_path(&settings.dir);
    std::fs::create_dir_all(&dir)?;
    let appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("log")
        .filename_suffix("log")
        .build(&dir)?;
    let (file_writer, guard) = tracing_appender::non_blocking(appender);

    let filter = EnvFilter::try_from_env("MENUDB_LOG").unwrap_or_else(|_| EnvFilter::new(&settings.filter));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true))
        .with(fmt::layer().with_ansi(false).with_writer(file_writer))
        .try_init()?;

    let _ = INIT.set(());
    Ok(Some(guard))
}
