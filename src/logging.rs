//! Structured logging for the salinisation screening service
//!
//! Provides context-rich logging tagged with the pipeline stage and, where
//! relevant, the source row. Supports console output and an optional log
//! file for batch runs.

use chrono::Utc;
use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::str::FromStr;
use std::sync::Mutex;

use crate::model::RejectedSample;

// ---------------------------------------------------------------------------
// Log Levels
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogLevel::Debug => write!(f, "DEBUG"),
            LogLevel::Info => write!(f, "INFO"),
            LogLevel::Warning => write!(f, "WARN"),
            LogLevel::Error => write!(f, "ERROR"),
        }
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warning),
            "error" => Ok(LogLevel::Error),
            other => Err(format!("unknown log level '{}'", other)),
        }
    }
}

// ---------------------------------------------------------------------------
// Pipeline stages
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Ingest,
    Convert,
    Classify,
    Interpret,
    Export,
    System,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Ingest => write!(f, "INGEST"),
            Stage::Convert => write!(f, "CONVERT"),
            Stage::Classify => write!(f, "CLASSIFY"),
            Stage::Interpret => write!(f, "INTERPRET"),
            Stage::Export => write!(f, "EXPORT"),
            Stage::System => write!(f, "SYS"),
        }
    }
}

// ---------------------------------------------------------------------------
// Logger Configuration
// ---------------------------------------------------------------------------

/// Global logger instance
static LOGGER: Mutex<Option<Logger>> = Mutex::new(None);

pub struct Logger {
    /// Minimum log level to emit
    min_level: LogLevel,
    /// Optional file path for logging
    log_file: Option<String>,
    /// Whether to include timestamps in console output
    console_timestamps: bool,
}

impl Logger {
    pub fn init(min_level: LogLevel, log_file: Option<String>, console_timestamps: bool) {
        let logger = Logger {
            min_level,
            log_file,
            console_timestamps,
        };

        // A poisoned lock only means a previous holder panicked mid-write.
        let mut slot = LOGGER.lock().unwrap_or_else(|e| e.into_inner());
        *slot = Some(logger);
    }

    fn log(&self, level: LogLevel, stage: Stage, row: Option<usize>, message: &str) {
        if level < self.min_level {
            return;
        }

        let row_part = row.map(|r| format!(" [row {}]", r)).unwrap_or_default();
        let log_entry = format_entry(level, stage, row_part.as_str(), message);

        if self.console_timestamps {
            match level {
                LogLevel::Error | LogLevel::Warning => eprintln!("{}", log_entry),
                LogLevel::Info | LogLevel::Debug => println!("{}", log_entry),
            }
        } else {
            match level {
                LogLevel::Error => eprintln!("   ✗ {}{}: {}", stage, row_part, message),
                LogLevel::Warning => eprintln!("   ⚠ {}{}: {}", stage, row_part, message),
                LogLevel::Info => println!("   {}", message),
                LogLevel::Debug => println!("   [DEBUG] {}{}: {}", stage, row_part, message),
            }
        }

        if let Some(ref path) = self.log_file {
            if let Err(e) = Self::append_to_file(path, &log_entry) {
                eprintln!("Failed to write to log file {}: {}", path, e);
            }
        }
    }

    fn append_to_file(path: &str, entry: &str) -> std::io::Result<()> {
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        writeln!(file, "{}", entry)?;
        Ok(())
    }
}

fn format_entry(level: LogLevel, stage: Stage, row_part: &str, message: &str) -> String {
    let timestamp = Utc::now().format("%Y-%m-%d %H:%M:%S UTC");
    format!("{} {} {}{}: {}", timestamp, level, stage, row_part, message)
}

fn emit(level: LogLevel, stage: Stage, row: Option<usize>, message: &str) {
    if let Ok(guard) = LOGGER.lock() {
        if let Some(logger) = guard.as_ref() {
            logger.log(level, stage, row, message);
        }
    }
}

// ---------------------------------------------------------------------------
// Public Logging Functions
// ---------------------------------------------------------------------------

/// Initialize the global logger. Until this is called all logging is a no-op.
pub fn init_logger(min_level: LogLevel, log_file: Option<&str>, console_timestamps: bool) {
    Logger::init(min_level, log_file.map(String::from), console_timestamps);
}

pub fn info(stage: Stage, row: Option<usize>, message: &str) {
    emit(LogLevel::Info, stage, row, message);
}

pub fn warn(stage: Stage, row: Option<usize>, message: &str) {
    emit(LogLevel::Warning, stage, row, message);
}

pub fn error(stage: Stage, row: Option<usize>, message: &str) {
    emit(LogLevel::Error, stage, row, message);
}

pub fn debug(stage: Stage, row: Option<usize>, message: &str) {
    emit(LogLevel::Debug, stage, row, message);
}

// ---------------------------------------------------------------------------
// Structured helpers
// ---------------------------------------------------------------------------

/// Log a refused sample with its column and reason.
pub fn log_rejection(stage: Stage, rejected: &RejectedSample) {
    let message = format!(
        "sample rejected: {} = '{}' ({})",
        rejected.column, rejected.raw, rejected.reason
    );
    warn(stage, Some(rejected.row), &message);
}

/// Level for a run summary: clean runs are informational, partial runs are
/// warnings, runs where nothing could be assessed are errors.
pub fn summary_level(total: usize, assessed: usize) -> LogLevel {
    if assessed == total {
        LogLevel::Info
    } else if assessed == 0 {
        LogLevel::Error
    } else {
        LogLevel::Warning
    }
}

/// Log a summary of one screening run
pub fn log_run_summary(total: usize, assessed: usize, rejected: usize) {
    let message = format!(
        "Screening complete: {}/{} samples assessed, {} rejected",
        assessed, total, rejected
    );
    emit(summary_level(total, assessed), Stage::System, None, &message);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_ordering() {
        assert!(LogLevel::Debug < LogLevel::Info);
        assert!(LogLevel::Info < LogLevel::Warning);
        assert!(LogLevel::Warning < LogLevel::Error);
    }

    #[test]
    fn test_log_level_parsing() {
        assert_eq!("warn".parse::<LogLevel>(), Ok(LogLevel::Warning));
        assert_eq!(" DEBUG ".parse::<LogLevel>(), Ok(LogLevel::Debug));
        assert!("loud".parse::<LogLevel>().is_err());
    }

    #[test]
    fn test_summary_level_classification() {
        assert_eq!(summary_level(10, 10), LogLevel::Info);
        assert_eq!(summary_level(10, 7), LogLevel::Warning);
        assert_eq!(summary_level(10, 0), LogLevel::Error);
        assert_eq!(summary_level(0, 0), LogLevel::Info);
    }

    #[test]
    fn test_entry_carries_stage_and_row() {
        let entry = format_entry(LogLevel::Warning, Stage::Ingest, " [row 4]", "bad value");
        assert!(entry.ends_with("WARN INGEST [row 4]: bad value"), "got {}", entry);
        assert!(entry.contains("UTC"));
    }
}
