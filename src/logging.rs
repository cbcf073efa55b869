use std::path::Path;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Mutex, OnceLock};

use eyre::Result;
use flexi_logger::{FileSpec, Logger, LoggerHandle, WriteMode};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LogLevel {
    Error = 0,
    Warn = 1,
    Info = 2,
    Debug = 3,
}

impl LogLevel {
    pub fn from_verbosity(verbose: u8, debug: bool) -> Self {
        if debug {
            return LogLevel::Debug;
        }
        match verbose {
            0 => LogLevel::Warn,
            1 => LogLevel::Info,
            _ => LogLevel::Debug,
        }
    }

    fn as_log(self) -> log::Level {
        match self {
            LogLevel::Error => log::Level::Error,
            LogLevel::Warn => log::Level::Warn,
            LogLevel::Info => log::Level::Info,
            LogLevel::Debug => log::Level::Debug,
        }
    }

    fn label(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
        }
    }
}

static LOG_LEVEL: AtomicU8 = AtomicU8::new(LogLevel::Warn as u8);
static FILE_LOGGER: OnceLock<Mutex<Option<LoggerHandle>>> = OnceLock::new();

pub fn init(level: LogLevel) {
    LOG_LEVEL.store(level as u8, Ordering::Relaxed);
}

/// Send every diagnostic to `path` instead of stderr.
///
/// The terminal UI owns the screen while it runs. The backing logger can only
/// be started once per process, so a second call fails.
pub fn log_to_file(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let handle = Logger::try_with_str("debug")?
        .log_to_file(FileSpec::try_from(path)?)
        .write_mode(WriteMode::BufferAndFlush)
        .append()
        .format_for_files(flexi_logger::detailed_format)
        .start()?;
    let slot = FILE_LOGGER.get_or_init(|| Mutex::new(None));
    if let Ok(mut guard) = slot.lock() {
        *guard = Some(handle);
    }
    Ok(())
}

/// Flush the log file and fall back to stderr.
pub fn close_file() {
    let handle = FILE_LOGGER
        .get()
        .and_then(|slot| slot.lock().ok())
        .and_then(|mut guard| guard.take());
    if let Some(handle) = handle {
        handle.flush();
        handle.shutdown();
    }
}

pub fn error(message: impl AsRef<str>) {
    emit(LogLevel::Error, message.as_ref());
}

pub fn warn(message: impl AsRef<str>) {
    emit(LogLevel::Warn, message.as_ref());
}

pub fn info(message: impl AsRef<str>) {
    emit(LogLevel::Info, message.as_ref());
}

pub fn debug(message: impl AsRef<str>) {
    emit(LogLevel::Debug, message.as_ref());
}

fn emit(level: LogLevel, message: &str) {
    let current = LOG_LEVEL.load(Ordering::Relaxed);
    if current < level as u8 {
        return;
    }
    let to_file = FILE_LOGGER
        .get()
        .and_then(|slot| slot.lock().ok())
        .is_some_and(|guard| guard.is_some());
    if to_file {
        log::log!(level.as_log(), "{message}");
    } else {
        eprintln!("[{}] {}", level.label(), message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_maps_to_levels() {
        assert_eq!(LogLevel::from_verbosity(0, false), LogLevel::Warn);
        assert_eq!(LogLevel::from_verbosity(1, false), LogLevel::Info);
        assert_eq!(LogLevel::from_verbosity(2, false), LogLevel::Debug);
        assert_eq!(LogLevel::from_verbosity(0, true), LogLevel::Debug);
    }

    #[test]
    fn file_logger_receives_filtered_messages() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs").join("scrollmark.log");
        init(LogLevel::Warn);
        log_to_file(&path).unwrap();
        warn("preference write dropped");
        debug("filtered out");
        close_file();

        let written: String = std::fs::read_dir(path.parent().unwrap())
            .unwrap()
            .map(|entry| std::fs::read_to_string(entry.unwrap().path()).unwrap())
            .collect();
        assert!(written.contains("WARN"));
        assert!(written.contains("preference write dropped"));
        assert!(!written.contains("filtered out"));
    }
}
