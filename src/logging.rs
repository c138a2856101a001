//! Logging setup for the application.
//!
//! Installs a global tracing subscriber that writes to stdout and, when the
//! app directory is usable, to a per-launch log file. Old launch logs are
//! pruned so the folder stays bounded.

use std::{
    fs::{self, OpenOptions},
    path::{Path, PathBuf},
    sync::OnceLock,
    time::SystemTime,
};

use time::{OffsetDateTime, UtcOffset, format_description::FormatItem, macros::format_description};
use tracing_appender::{non_blocking::WorkerGuard, rolling};
use tracing_subscriber::{EnvFilter, Registry, fmt, prelude::*};

use crate::app_dirs;

/// Maximum number of launch logs kept on disk.
const MAX_LOG_FILES: usize = 10;
const LOG_FILE_PREFIX: &str = "yov";
const DEFAULT_FILTER: &str = "info,ureq=warn,rustls=warn";

static LOG_GUARD: OnceLock<Option<WorkerGuard>> = OnceLock::new();

/// Where log output ended up after [`init`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogDestination {
    /// Stdout plus the given launch log file.
    File(PathBuf),
    /// Stdout only; the file sink could not be prepared.
    StdoutOnly(String),
    /// Logging was already initialized by an earlier call.
    AlreadyInitialized,
}

/// Errors that may occur while preparing the log file sink or subscriber.
#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    /// The log directory could not be resolved or created.
    #[error("Log directory unavailable: {0}")]
    Directory(#[from] app_dirs::AppDirError),
    /// Failed to enumerate existing log files for pruning.
    #[error("Failed to read log directory {path}: {source}")]
    ReadDir {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Failed to remove an obsolete log file.
    #[error("Failed to remove old log file {path}: {source}")]
    RemoveFile {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Failed to create the log file for this launch.
    #[error("Failed to create log file at {path}: {source}")]
    CreateLogFile {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Failed to format a timestamp for the log filename.
    #[error("Failed to format log filename time: {0}")]
    FormatTime(time::error::Format),
    /// Failed to set the global tracing subscriber.
    #[error("Failed to install global tracing subscriber: {0}")]
    SetGlobal(tracing::subscriber::SetGlobalDefaultError),
}

/// Initialize tracing for stdout and a launch log file.
///
/// When the file sink cannot be prepared, stdout logging is still installed
/// and the reason is returned in [`LogDestination::StdoutOnly`]. Only a
/// failure to install the subscriber itself is an error.
pub fn init() -> Result<LogDestination, LoggingError> {
    if LOG_GUARD.get().is_some() {
        return Ok(LogDestination::AlreadyInitialized);
    }

    let stdout_layer = fmt::layer()
        .with_timer(build_timer())
        .with_writer(std::io::stdout);
    let registry = Registry::default().with(build_env_filter()).with(stdout_layer);

    match prepare_log_file() {
        Ok((log_dir, file_name)) => {
            let log_path = log_dir.join(&file_name);
            let (file_writer, guard) =
                tracing_appender::non_blocking(rolling::never(&log_dir, file_name));
            let file_layer = fmt::layer()
                .with_ansi(false)
                .with_timer(build_timer())
                .with_writer(file_writer);
            tracing::subscriber::set_global_default(registry.with(file_layer))
                .map_err(LoggingError::SetGlobal)?;
            let _ = LOG_GUARD.set(Some(guard));
            tracing::info!(version = env!("CARGO_PKG_VERSION"), "Logging to {}", log_path.display());
            Ok(LogDestination::File(log_path))
        }
        Err(err) => {
            tracing::subscriber::set_global_default(registry).map_err(LoggingError::SetGlobal)?;
            let _ = LOG_GUARD.set(None);
            let reason = err.to_string();
            tracing::warn!("File logging disabled: {reason}");
            Ok(LogDestination::StdoutOnly(reason))
        }
    }
}

fn prepare_log_file() -> Result<(PathBuf, String), LoggingError> {
    let log_dir = app_dirs::logs_dir()?;
    let file_name = format_log_file_name(now_local_or_utc())?;
    ensure_file_exists(&log_dir.join(&file_name))?;
    prune_old_logs(&log_dir, MAX_LOG_FILES)?;
    Ok((log_dir, file_name))
}

fn ensure_file_exists(path: &Path) -> Result<(), LoggingError> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map(|_| ())
        .map_err(|source| LoggingError::CreateLogFile {
            path: path.to_path_buf(),
            source,
        })
}

fn prune_old_logs(dir: &Path, max_files: usize) -> Result<(), LoggingError> {
    let mut entries = fs::read_dir(dir)
        .map_err(|source| LoggingError::ReadDir {
            path: dir.to_path_buf(),
            source,
        })?
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().map(|ft| ft.is_file()).unwrap_or(false))
        .filter(|entry| entry.path().extension().and_then(|ext| ext.to_str()) == Some("log"))
        .map(|entry| {
            let modified = entry
                .metadata()
                .and_then(|meta| meta.modified())
                .unwrap_or(SystemTime::UNIX_EPOCH);
            (modified, entry.path())
        })
        .collect::<Vec<_>>();

    if entries.len() <= max_files {
        return Ok(());
    }
    entries.sort_by_key(|(modified, _)| *modified);
    let excess = entries.len() - max_files;
    for (_, path) in entries.into_iter().take(excess) {
        fs::remove_file(&path).map_err(|source| LoggingError::RemoveFile { path, source })?;
    }
    Ok(())
}

fn format_log_file_name(now: OffsetDateTime) -> Result<String, LoggingError> {
    const NAME_FORMAT: &[FormatItem<'_>] =
        format_description!("[year]-[month]-[day]_[hour]-[minute]-[second]");
    let name = now.format(NAME_FORMAT).map_err(LoggingError::FormatTime)?;
    Ok(format!("{LOG_FILE_PREFIX}_{name}.log"))
}

fn build_timer() -> fmt::time::OffsetTime<time::format_description::BorrowedFormatItem<'static>> {
    const DISPLAY_FORMAT: &[FormatItem<'static>] =
        format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");
    let offset = UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC);
    fmt::time::OffsetTime::new(offset, DISPLAY_FORMAT.into())
}

fn now_local_or_utc() -> OffsetDateTime {
    OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc())
}

fn build_env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}
