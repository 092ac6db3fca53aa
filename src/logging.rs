// ============================================================================
// src/logging.rs – Console + log file subscriber, set up once in main
// ============================================================================

use std::fs::{self, OpenOptions};
use std::path::Path;

use anyhow::{bail, Context};
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::ui;

pub const LOG_FILE_NAME: &str = "lun_format.log";

/// Keeps the background file writer alive; drop it last.
#[must_use]
pub struct LogGuard {
    _file: Option<WorkerGuard>,
}

/// INFO by default, DEBUG with `--debug`; `RUST_LOG` wins over both.
pub fn init(dir: &Path, debug: bool) -> LogGuard {
    let level = if debug { "debug" } else { "info" };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let console_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    match file_writer(dir) {
        Ok((writer, guard)) => {
            let file_layer = tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_thread_names(true);
            let _ = tracing_subscriber::registry()
                .with(env_filter)
                .with(console_layer)
                .with(file_layer)
                .try_init();
            LogGuard { _file: Some(guard) }
        }
        Err(e) => {
            ui::warn(&format!("file logging disabled: {e:#}"));
            let _ = tracing_subscriber::registry()
                .with(env_filter)
                .with(console_layer)
                .try_init();
            LogGuard { _file: None }
        }
    }
}

/// Appends to `<dir>/lun_format.log`. The directory must already exist and
/// be writable by the invoking user.
fn file_writer(dir: &Path) -> anyhow::Result<(NonBlocking, WorkerGuard)> {
    let meta = fs::metadata(dir)
        .with_context(|| format!("unable to use log directory {}", dir.display()))?;
    if !meta.is_dir() {
        bail!("log path {} is not a directory", dir.display());
    }

    let path = dir.join(LOG_FILE_NAME);
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("unable to open {}", path.display()))?;

    let appender = tracing_appender::rolling::never(dir, LOG_FILE_NAME);
    Ok(tracing_appender::non_blocking(appender))
}
