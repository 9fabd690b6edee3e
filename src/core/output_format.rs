//! Output format configuration for log entries
//!
//! Provides different output formats for log entries:
//! - Text: Human-readable format (default)
//! - Json: Machine-readable JSON format
//! - Logfmt: Key-value format compatible with log aggregation tools
//!
//! The [`Formatter`] trait is the seam between entries and their textual
//! form. `FormatterConfig` is the stock implementation; any other type can
//! be plugged into a logger or appender instead.

use super::error::{LoggerError, Result};
use super::log_context::{escape_controls, quote, quote_if_needed, FieldValue};
use super::log_entry::LogEntry;
use super::timestamp::{FormatterConfig, TimestampFormat};
use std::fmt::Write;

/// Keys the JSON layout reserves for its own metadata
const RESERVED_JSON_KEYS: [&str; 5] = ["timestamp", "level", "message", "thread_id", "thread_name"];

/// Renders a [`LogEntry`] into text
///
/// On failure, `out` keeps whatever was written before the error so callers
/// can still show partial output. Output must be a single line.
pub trait Formatter: Send + Sync {
    fn format(&self, entry: &LogEntry, out: &mut String) -> Result<()>;

    /// Whether terminal colors may be applied to the rendered line
    fn supports_color(&self) -> bool {
        false
    }
}

/// Output format for log entries
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable text format (default)
    ///
    /// Example: `[2025-01-08T10:30:45.123Z] [INFO ] main - Request processed user_id=42`
    #[default]
    Text,

    /// JSON format for machine processing
    ///
    /// Example: `{"level":"info","message":"Request processed","user_id":42}`
    Json,

    /// Logfmt format (key=value pairs)
    ///
    /// Example: `timestamp=2025-01-08T10:30:45.123Z level=info message="Request processed"`
    Logfmt,
}

impl Formatter for FormatterConfig {
    fn format(&self, entry: &LogEntry, out: &mut String) -> Result<()> {
        match self.output_format {
            OutputFormat::Text => format_text(self, entry, out),
            OutputFormat::Json => format_json(self, entry, out),
            OutputFormat::Logfmt => format_logfmt(self, entry, out),
        }
    }

    fn supports_color(&self) -> bool {
        self.output_format == OutputFormat::Text
    }
}

fn level_str(config: &FormatterConfig, entry: &LogEntry) -> &'static str {
    if config.level_uppercase {
        entry.level.to_str()
    } else {
        entry.level.to_lowercase_str()
    }
}

fn format_text(config: &FormatterConfig, entry: &LogEntry, out: &mut String) -> Result<()> {
    if config.include_timestamp {
        out.push('[');
        config.timestamp_format.write_to(&entry.timestamp, out)?;
        out.push_str("] ");
    }
    write!(out, "[{:5}]", level_str(config, entry))?;
    if config.include_thread_id {
        let thread = entry.thread_name.as_ref().unwrap_or(&entry.thread_id);
        write!(out, " {} -", escape_controls(thread))?;
    }
    if !entry.message.is_empty() {
        write!(out, " {}", entry.message)?;
    }
    if let Some(context) = entry.fields() {
        write!(out, " {}", context.format_fields())?;
    }
    Ok(())
}

fn timestamp_json(format: &TimestampFormat, entry: &LogEntry) -> Result<serde_json::Value> {
    Ok(match format {
        TimestampFormat::Unix => serde_json::Value::Number(entry.timestamp.timestamp().into()),
        TimestampFormat::UnixMillis => {
            serde_json::Value::Number(entry.timestamp.timestamp_millis().into())
        }
        _ => serde_json::Value::String(format.format(&entry.timestamp)?),
    })
}

fn format_json(config: &FormatterConfig, entry: &LogEntry, out: &mut String) -> Result<()> {
    let mut json_obj = serde_json::Map::new();

    if config.include_timestamp {
        json_obj.insert(
            "timestamp".to_string(),
            timestamp_json(&config.timestamp_format, entry)?,
        );
    }
    json_obj.insert(
        "level".to_string(),
        serde_json::Value::String(level_str(config, entry).to_string()),
    );
    json_obj.insert(
        "message".to_string(),
        serde_json::Value::String(entry.message.clone()),
    );
    if config.include_thread_id {
        json_obj.insert(
            "thread_id".to_string(),
            serde_json::Value::String(entry.thread_id.clone()),
        );
        if let Some(ref name) = entry.thread_name {
            json_obj.insert(
                "thread_name".to_string(),
                serde_json::Value::String(name.clone()),
            );
        }
    }

    if let Some(context) = entry.fields() {
        for field in context.rendered_fields() {
            // Fields never clobber the entry's own metadata
            let key = if RESERVED_JSON_KEYS.contains(&&*field.key) {
                format!("fields.{}", field.key)
            } else {
                field.key.into_owned()
            };
            json_obj.insert(key, field.value.to_json_value());
            if let Some((site_key, site)) = field.call_site {
                json_obj.insert(site_key, serde_json::Value::String(site.to_string()));
            }
        }
    }

    let json = serde_json::to_string(&serde_json::Value::Object(json_obj))
        .map_err(LoggerError::from)?;
    out.push_str(&json);
    Ok(())
}

fn format_logfmt(config: &FormatterConfig, entry: &LogEntry, out: &mut String) -> Result<()> {
    let mut parts = Vec::new();

    if config.include_timestamp {
        parts.push(format!(
            "timestamp={}",
            quote_if_needed(&config.timestamp_format.format(&entry.timestamp)?)
        ));
    }
    parts.push(format!("level={}", level_str(config, entry)));
    parts.push(format!("message={}", quote(&entry.message)));
    if config.include_thread_id {
        parts.push(format!("thread_id={}", quote_if_needed(&entry.thread_id)));
        if let Some(ref name) = entry.thread_name {
            parts.push(format!("thread_name={}", quote_if_needed(name)));
        }
    }

    if let Some(context) = entry.fields() {
        for field in context.rendered_fields() {
            let key = escape_logfmt_key(&field.key);
            match field.value {
                FieldValue::String(s) => parts.push(format!("{}={}", key, quote(s))),
                FieldValue::Error(err) => parts.push(format!("{}={}", key, quote(&err.message))),
                other => parts.push(format!("{}={}", key, other)),
            }
            if let Some((site_key, site)) = field.call_site {
                parts.push(format!(
                    "{}={}",
                    escape_logfmt_key(&site_key),
                    quote(&site.to_string())
                ));
            }
        }
    }

    out.push_str(&parts.join(" "));
    Ok(())
}

/// Escape a logfmt key (remove spaces and special chars)
fn escape_logfmt_key(key: &str) -> String {
    key.chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || *c == '-' || *c == '.')
        .collect()
}
