//! Timestamp formatting and formatter configuration
//!
//! `TimestampFormat` controls how entry timestamps are printed.
//! `FormatterConfig` bundles it with the output layout and is the default
//! [`Formatter`](super::output_format::Formatter) used by loggers and appenders.

use super::error::{LoggerError, Result};
use super::output_format::OutputFormat;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Write;

/// Standardized timestamp format options
///
/// # Examples
///
/// ```
/// use entry_logger::core::TimestampFormat;
/// use chrono::Utc;
///
/// let format = TimestampFormat::Iso8601;
/// let timestamp = format.format(&Utc::now()).unwrap();
/// assert!(timestamp.ends_with('Z'));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimestampFormat {
    /// ISO 8601 with milliseconds: `2025-01-08T10:30:45.123Z`
    #[default]
    Iso8601,

    /// ISO 8601 with microseconds: `2025-01-08T10:30:45.123456Z`
    Iso8601Micros,

    /// RFC 3339 format: `2025-01-08T10:30:45+00:00`
    Rfc3339,

    /// Unix timestamp in seconds: `1736332245`
    Unix,

    /// Unix timestamp in milliseconds: `1736332245123`
    UnixMillis,

    /// Custom strftime format
    ///
    /// An invalid pattern is reported as a formatter error when an entry is
    /// rendered.
    Custom(String),
}

impl TimestampFormat {
    pub fn format(&self, datetime: &DateTime<Utc>) -> Result<String> {
        let mut out = String::new();
        self.write_to(datetime, &mut out)?;
        Ok(out)
    }

    /// Append the formatted timestamp to `out`
    pub fn write_to(&self, datetime: &DateTime<Utc>, out: &mut String) -> Result<()> {
        match self {
            TimestampFormat::Iso8601 => {
                write!(out, "{}", datetime.format("%Y-%m-%dT%H:%M:%S%.3fZ"))?
            }
            TimestampFormat::Iso8601Micros => {
                write!(out, "{}", datetime.format("%Y-%m-%dT%H:%M:%S%.6fZ"))?
            }
            TimestampFormat::Rfc3339 => out.push_str(&datetime.to_rfc3339()),
            TimestampFormat::Unix => write!(out, "{}", datetime.timestamp())?,
            TimestampFormat::UnixMillis => write!(out, "{}", datetime.timestamp_millis())?,
            TimestampFormat::Custom(format_str) => write!(out, "{}", datetime.format(format_str))
                .map_err(|_| {
                    LoggerError::formatter(
                        "timestamp",
                        format!("invalid strftime pattern '{}'", format_str),
                    )
                })?,
        }
        Ok(())
    }
}

/// Configuration for log formatting
///
/// # Examples
///
/// ```
/// use entry_logger::core::{FormatterConfig, OutputFormat, TimestampFormat};
///
/// let config = FormatterConfig::new()
///     .with_output_format(OutputFormat::Logfmt)
///     .with_timestamp_format(TimestampFormat::Iso8601Micros)
///     .with_include_thread_id(false);
/// ```
#[derive(Debug, Clone)]
pub struct FormatterConfig {
    /// Layout of each rendered line
    pub output_format: OutputFormat,
    /// Timestamp format for log entries
    pub timestamp_format: TimestampFormat,
    /// Whether to include the timestamp in text output
    pub include_timestamp: bool,
    /// Whether to include the thread name or ID in text output
    pub include_thread_id: bool,
    /// Whether to display log level in uppercase (ERROR vs error)
    pub level_uppercase: bool,
}

impl Default for FormatterConfig {
    fn default() -> Self {
        Self {
            output_format: OutputFormat::default(),
            timestamp_format: TimestampFormat::default(),
            include_timestamp: true,
            include_thread_id: true,
            level_uppercase: true,
        }
    }
}

impl FormatterConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = format;
        self
    }

    #[must_use]
    pub fn with_timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.timestamp_format = format;
        self
    }

    /// Use a strftime-compatible format string for timestamps
    #[must_use]
    pub fn with_custom_timestamp(mut self, format_str: &str) -> Self {
        self.timestamp_format = TimestampFormat::Custom(format_str.to_string());
        self
    }

    #[must_use]
    pub fn with_include_timestamp(mut self, include: bool) -> Self {
        self.include_timestamp = include;
        self
    }

    #[must_use]
    pub fn with_include_thread_id(mut self, include: bool) -> Self {
        self.include_thread_id = include;
        self
    }

    #[must_use]
    pub fn with_level_uppercase(mut self, uppercase: bool) -> Self {
        self.level_uppercase = uppercase;
        self
    }
}
