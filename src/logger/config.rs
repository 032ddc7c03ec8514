//! Configuration types for the logger

use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::level_filters::LevelFilter;

/// Severity accepted by `LOG_LEVEL` and `LOG_FILE_LEVEL`
///
/// `Fatal` is emitted through tracing's ERROR level, `Silent` turns the
/// sink off entirely.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Fatal,
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
    Silent,
}

impl LogLevel {
    /// All accepted values, in schema order
    pub const CHOICES: &'static [&'static str] =
        &["fatal", "error", "warn", "info", "debug", "trace", "silent"];

    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Fatal => "fatal",
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
            LogLevel::Silent => "silent",
        }
    }

    /// Numeric severity, higher is less verbose. `Silent` sorts above everything.
    pub fn severity(&self) -> u32 {
        match self {
            LogLevel::Trace => 10,
            LogLevel::Debug => 20,
            LogLevel::Info => 30,
            LogLevel::Warn => 40,
            LogLevel::Error => 50,
            LogLevel::Fatal => 60,
            LogLevel::Silent => u32::MAX,
        }
    }

    /// Level filter letting through everything at this level and above
    ///
    /// `Fatal` shares ERROR here; [`SinkFilter`](crate::logger::SinkFilter)
    /// narrows it to events marked fatal.
    pub fn as_filter(&self) -> LevelFilter {
        match self {
            LogLevel::Trace => LevelFilter::TRACE,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Error | LogLevel::Fatal => LevelFilter::ERROR,
            LogLevel::Silent => LevelFilter::OFF,
        }
    }

    /// The more verbose of two levels
    pub fn most_verbose(self, other: LogLevel) -> LogLevel {
        if other.severity() < self.severity() {
            other
        } else {
            self
        }
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fatal" => Ok(LogLevel::Fatal),
            "error" => Ok(LogLevel::Error),
            "warn" => Ok(LogLevel::Warn),
            "info" => Ok(LogLevel::Info),
            "debug" => Ok(LogLevel::Debug),
            "trace" => Ok(LogLevel::Trace),
            "silent" => Ok(LogLevel::Silent),
            _ => Err(format!(
                "Value \"{}\" not in choices [{}]",
                s,
                Self::CHOICES.join(", ")
            )),
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the `level` field of each record is rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LevelLabel {
    /// `"level": "INFO"`
    Uppercase,
    /// `"level": 30`
    Numeric,
}

impl LevelLabel {
    pub fn from_stringified(stringified: bool) -> Self {
        if stringified {
            LevelLabel::Uppercase
        } else {
            LevelLabel::Numeric
        }
    }
}

/// File used when file logging is on but no name was configured
pub const DEFAULT_LOG_FILE: &str = "app.log";

/// Resolve the file sink path
pub fn file_sink_path(name: Option<&str>) -> PathBuf {
    match name {
        Some(name) if !name.is_empty() => PathBuf::from(name),
        _ => PathBuf::from(DEFAULT_LOG_FILE),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_log_levels() {
        for choice in LogLevel::CHOICES {
            let level: LogLevel = choice.parse().unwrap();
            assert_eq!(level.as_str(), *choice);
        }
    }

    #[test]
    fn test_invalid_log_level() {
        assert!("verbose".parse::<LogLevel>().is_err());
        assert!("INFO".parse::<LogLevel>().is_err());
    }

    #[test]
    fn test_most_verbose() {
        assert_eq!(LogLevel::Info.most_verbose(LogLevel::Debug), LogLevel::Debug);
        assert_eq!(LogLevel::Warn.most_verbose(LogLevel::Silent), LogLevel::Warn);
        assert_eq!(LogLevel::Silent.most_verbose(LogLevel::Silent), LogLevel::Silent);
        assert_eq!(LogLevel::Fatal.most_verbose(LogLevel::Error), LogLevel::Error);
    }

    #[test]
    fn test_level_filters() {
        assert_eq!(LogLevel::Fatal.as_filter(), LevelFilter::ERROR);
        assert_eq!(LogLevel::Silent.as_filter(), LevelFilter::OFF);
        assert_eq!(LogLevel::Trace.as_filter(), LevelFilter::TRACE);
    }

    #[test]
    fn test_file_sink_path_default() {
        assert_eq!(file_sink_path(None), PathBuf::from("app.log"));
        assert_eq!(file_sink_path(Some("")), PathBuf::from("app.log"));
        assert_eq!(file_sink_path(Some("logs/svc.log")), PathBuf::from("logs/svc.log"));
    }
}
