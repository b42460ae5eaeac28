//! Process-wide rolling file logs.
//!
//! # Responsibility
//! - Start the `flexi_logger` file backend once per process.
//! - Capture panics as sanitized log events.
//!
//! # Invariants
//! - Initialization is idempotent for an identical `(level, dir)` pair.
//! - Any attempt to switch level or directory afterwards is rejected.
//! - Initialization never panics.
//! - Log lines carry metadata only; reminder titles and descriptions are
//!   never written.

use flexi_logger::{Cleanup, Criterion, FileSpec, Logger, LoggerHandle, Naming, WriteMode};
use log::{error, info};
use once_cell::sync::OnceCell;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

const LOG_FILE_BASENAME: &str = "reminders";
const MAX_LOG_FILE_SIZE_BYTES: u64 = 5 * 1024 * 1024;
const MAX_LOG_FILES: usize = 5;
const MAX_PANIC_PAYLOAD_CHARS: usize = 160;

static ACTIVE: OnceCell<ActiveLogger> = OnceCell::new();
static PANIC_HOOK: OnceCell<()> = OnceCell::new();

struct ActiveLogger {
    settings: LogSettings,
    _handle: LoggerHandle,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct LogSettings {
    level: &'static str,
    dir: PathBuf,
}

impl LogSettings {
    fn parse(level: &str, log_dir: &str) -> Result<Self, LoggingError> {
        Ok(Self {
            level: normalize_level(level)?,
            dir: normalize_log_dir(log_dir)?,
        })
    }
}

/// Logging bootstrap failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoggingError {
    UnsupportedLevel(String),
    EmptyLogDir,
    RelativeLogDir(String),
    /// Already running with a different level or directory.
    Reconfigure { active: String, requested: String },
    Backend(String),
}

impl Display for LoggingError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnsupportedLevel(value) => write!(
                f,
                "unsupported log level `{value}`; expected trace|debug|info|warn|error"
            ),
            Self::EmptyLogDir => write!(f, "log_dir cannot be empty"),
            Self::RelativeLogDir(value) => {
                write!(f, "log_dir must be an absolute path, got `{value}`")
            }
            Self::Reconfigure { active, requested } => write!(
                f,
                "logging already initialized with {active}; refusing to switch to {requested}"
            ),
            Self::Backend(message) => write!(f, "failed to start logger: {message}"),
        }
    }
}

impl Error for LoggingError {}

/// Starts file logging at `level` under the absolute directory `log_dir`.
///
/// # Errors
/// - Unsupported level, empty or relative directory.
/// - A previous call configured a different level or directory.
/// - The directory cannot be created or the backend fails to start.
pub fn init_logging(level: &str, log_dir: &str) -> Result<(), LoggingError> {
    let requested = LogSettings::parse(level, log_dir)?;

    let active = ACTIVE.get_or_try_init(|| start_logger(requested.clone()))?;
    if active.settings != requested {
        return Err(LoggingError::Reconfigure {
            active: describe(&active.settings),
            requested: describe(&requested),
        });
    }
    Ok(())
}

/// Returns `(level, log_dir)` of the running logger, if any.
pub fn logging_status() -> Option<(&'static str, PathBuf)> {
    ACTIVE
        .get()
        .map(|active| (active.settings.level, active.settings.dir.clone()))
}

/// `debug` in debug builds, `info` in release builds.
pub fn default_log_level() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    }
}

fn start_logger(settings: LogSettings) -> Result<ActiveLogger, LoggingError> {
    std::fs::create_dir_all(&settings.dir).map_err(|err| {
        LoggingError::Backend(format!(
            "cannot create log directory `{}`: {err}",
            settings.dir.display()
        ))
    })?;

    let handle = Logger::try_with_str(settings.level)
        .map_err(|err| LoggingError::Backend(err.to_string()))?
        .log_to_file(
            FileSpec::default()
                .directory(settings.dir.as_path())
                .basename(LOG_FILE_BASENAME),
        )
        .rotate(
            Criterion::Size(MAX_LOG_FILE_SIZE_BYTES),
            Naming::Numbers,
            Cleanup::KeepLogFiles(MAX_LOG_FILES),
        )
        .write_mode(WriteMode::BufferAndFlush)
        .append()
        .format_for_files(flexi_logger::detailed_format)
        .start()
        .map_err(|err| LoggingError::Backend(err.to_string()))?;

    install_panic_hook();
    info!(
        "event=logging_start module=core status=ok level={} version={} platform={}",
        settings.level,
        env!("CARGO_PKG_VERSION"),
        std::env::consts::OS
    );

    Ok(ActiveLogger {
        settings,
        _handle: handle,
    })
}

fn describe(settings: &LogSettings) -> String {
    format!("level `{}` at `{}`", settings.level, settings.dir.display())
}

fn normalize_level(level: &str) -> Result<&'static str, LoggingError> {
    match level.trim().to_ascii_lowercase().as_str() {
        "trace" => Ok("trace"),
        "debug" => Ok("debug"),
        "info" => Ok("info"),
        "warn" | "warning" => Ok("warn"),
        "error" => Ok("error"),
        other => Err(LoggingError::UnsupportedLevel(other.to_string())),
    }
}

fn normalize_log_dir(log_dir: &str) -> Result<PathBuf, LoggingError> {
    let trimmed = log_dir.trim();
    if trimmed.is_empty() {
        return Err(LoggingError::EmptyLogDir);
    }
    let path = Path::new(trimmed);
    if !path.is_absolute() {
        return Err(LoggingError::RelativeLogDir(trimmed.to_string()));
    }
    Ok(path.to_path_buf())
}

fn install_panic_hook() {
    if PANIC_HOOK.set(()).is_err() {
        return;
    }

    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let location = info
            .location()
            .map(|loc| format!("{}:{}", loc.file(), loc.line()))
            .unwrap_or_else(|| "unknown".to_string());
        let payload = info
            .payload()
            .downcast_ref::<&str>()
            .map(|message| (*message).to_string())
            .or_else(|| info.payload().downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "non-string panic payload".to_string());
        error!(
            "event=panic_captured module=core status=error location={} payload={}",
            location,
            sanitize_message(&payload, MAX_PANIC_PAYLOAD_CHARS)
        );
        previous(info);
    }));
}

/// Flattens newlines and caps length so one event stays on one line.
fn sanitize_message(value: &str, max_chars: usize) -> String {
    let flattened = value.replace(['\n', '\r'], " ");
    let mut capped: String = flattened.chars().take(max_chars).collect();
    if flattened.chars().count() > max_chars {
        capped.push_str("...");
    }
    capped
}

#[cfg(test)]
mod tests {
    use super::{
        init_logging, logging_status, normalize_level, normalize_log_dir, sanitize_message,
        LoggingError,
    };

    #[test]
    fn normalize_level_accepts_known_values() {
        assert_eq!(normalize_level(" WARNING ").unwrap(), "warn");
        assert!(matches!(
            normalize_level("verbose"),
            Err(LoggingError::UnsupportedLevel(_))
        ));
    }

    #[test]
    fn normalize_log_dir_requires_absolute_path() {
        assert_eq!(normalize_log_dir("  "), Err(LoggingError::EmptyLogDir));
        assert!(matches!(
            normalize_log_dir("logs/dev"),
            Err(LoggingError::RelativeLogDir(_))
        ));
    }

    #[test]
    fn sanitize_message_flattens_and_truncates() {
        let sanitized = sanitize_message("a\nb\rcdefgh", 4);
        assert_eq!(sanitized, "a b ...");
    }

    #[test]
    fn init_logging_is_idempotent_and_rejects_reconfiguration() {
        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();
        let first_dir = first.path().to_str().unwrap().to_string();
        let second_dir = second.path().to_str().unwrap().to_string();

        init_logging("info", &first_dir).unwrap();
        init_logging("INFO", &first_dir).unwrap();

        assert!(matches!(
            init_logging("debug", &first_dir),
            Err(LoggingError::Reconfigure { .. })
        ));
        assert!(matches!(
            init_logging("info", &second_dir),
            Err(LoggingError::Reconfigure { .. })
        ));

        let (level, dir) = logging_status().unwrap();
        assert_eq!(level, "info");
        assert_eq!(dir, first.path());
    }
}
