//! Logging initialisation.
//!
//! When the `CADENCE_LOG` environment variable is set to `1`, structured
//! logs are written to `cadence/cadence.log` under the user's data
//! directory, filtered by `RUST_LOG` (default `info`). Otherwise nothing is
//! installed: the terminal belongs to the UI and stderr output would tear it.
//!
//! Returns a guard that must be kept alive for the duration of the process
//! so that buffered log lines are flushed on exit.

use std::path::PathBuf;

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

pub struct LogGuard {
    _file_guard: Option<tracing_appender::non_blocking::WorkerGuard>,
}

/// Initialise the global tracing subscriber.
///
/// Call once from `main`, store the returned `LogGuard` in a local variable
/// for the duration of the process.
pub fn init() -> LogGuard {
    if std::env::var("CADENCE_LOG").as_deref() != Ok("1") {
        return LogGuard { _file_guard: None };
    }

    let dir = log_dir().unwrap_or_else(|| std::env::temp_dir().join("cadence"));
    let _ = std::fs::create_dir_all(&dir);
    let file_appender = tracing_appender::rolling::never(dir, "cadence.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::layer().with_writer(non_blocking).with_ansi(false);

    let installed = tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(file_layer)
        .try_init();

    LogGuard {
        _file_guard: installed.ok().map(|()| guard),
    }
}

fn log_dir() -> Option<PathBuf> {
    if let Some(xdg) = std::env::var_os("XDG_DATA_HOME") {
        return Some(PathBuf::from(xdg).join("cadence"));
    }
    let home = std::env::var_os("HOME")?;
    Some(
        PathBuf::from(home)
            .join(".local")
            .join("share")
            .join("cadence"),
    )
}
