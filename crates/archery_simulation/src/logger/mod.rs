//! Process-wide simulation logger
//!
//! The simulation never talks to stdout directly: every diagnostic goes through a
//! pluggable `LogPrinter` so the host (headless runner, tests, an engine bridge)
//! decides where lines end up.
//!
//! - `set_logger` / `set_logger_if_needed` install the printer
//! - `set_log_level` filters below a threshold (default: Debug)
//! - timestamps are added here, printers receive the final line

use once_cell::sync::Lazy;
use std::sync::Mutex;

static LOGGER: Lazy<Mutex<Option<Box<dyn LogPrinter>>>> = Lazy::new(|| Mutex::new(None));

static LOGGER_LEVEL: Lazy<Mutex<LogLevel>> = Lazy::new(|| Mutex::new(LogLevel::Debug));

/// Severity, ordered from most to least verbose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warning => "WARNING",
            LogLevel::Error => "ERROR",
        }
    }
}

pub trait LogPrinter: Send + Sync {
    fn log(&self, level: LogLevel, message: &str);
}

pub fn set_logger(logger: Box<dyn LogPrinter>) {
    if let Ok(mut slot) = LOGGER.lock() {
        *slot = Some(logger);
    }
}

pub fn set_logger_if_needed(logger: Box<dyn LogPrinter>) {
    if let Ok(mut slot) = LOGGER.lock() {
        if slot.is_none() {
            *slot = Some(logger);
        }
    }
}

pub fn set_log_level(level: LogLevel) {
    if let Ok(mut threshold) = LOGGER_LEVEL.lock() {
        *threshold = level;
    }
}

pub fn log_level() -> LogLevel {
    LOGGER_LEVEL
        .lock()
        .map(|level| *level)
        .unwrap_or(LogLevel::Debug)
}

pub fn log(message: &str) {
    log_with_level(LogLevel::Debug, message);
}

pub fn log_info(message: &str) {
    log_with_level(LogLevel::Info, message);
}

pub fn log_warning(message: &str) {
    log_with_level(LogLevel::Warning, message);
}

pub fn log_error(message: &str) {
    log_with_level(LogLevel::Error, message);
}

pub fn log_with_level(level: LogLevel, message: &str) {
    if !should_emit(level, log_level()) {
        return;
    }

    // A poisoned lock only means another thread panicked mid-log; drop the line.
    let Ok(slot) = LOGGER.lock() else {
        return;
    };
    if let Some(logger) = slot.as_ref() {
        let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
        logger.log(level, &format_line(&timestamp.to_string(), message));
    }
}

fn should_emit(level: LogLevel, threshold: LogLevel) -> bool {
    level >= threshold
}

fn format_line(timestamp: &str, message: &str) -> String {
    format!("[{}] {}", timestamp, message)
}

/// Default printer: `[LEVEL] [timestamp] message` on stdout.
pub struct ConsoleLogger;

impl LogPrinter for ConsoleLogger {
    fn log(&self, level: LogLevel, message: &str) {
        println!("[{}] {}", level.as_str(), message);
    }
}

pub fn init_logger() {
    set_logger_if_needed(Box::new(ConsoleLogger));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levels_are_ordered_by_severity() {
        assert!(LogLevel::Debug < LogLevel::Info);
        assert!(LogLevel::Info < LogLevel::Warning);
        assert!(LogLevel::Warning < LogLevel::Error);
    }

    #[test]
    fn test_threshold_filters_lower_levels() {
        assert!(should_emit(LogLevel::Warning, LogLevel::Info));
        assert!(should_emit(LogLevel::Info, LogLevel::Info));
        assert!(!should_emit(LogLevel::Debug, LogLevel::Info));
        assert!(!should_emit(LogLevel::Warning, LogLevel::Error));
    }

    #[test]
    fn test_format_line() {
        assert_eq!(
            format_line("2026-01-01 00:00:00.000", "arrow shot"),
            "[2026-01-01 00:00:00.000] arrow shot"
        );
    }
}
