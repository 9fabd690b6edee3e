//! Console appender implementation

use crate::core::{Appender, Formatter, FormatterConfig, LogEntry, LogLevel, OutputFormat, Result};
#[cfg(feature = "console")]
use colored::Colorize;
use std::sync::Arc;

/// Writes one line per entry to stdout, or stderr for Error and Fatal
///
/// Colors apply only when the formatter in use supports them.
pub struct ConsoleAppender {
    use_colors: bool,
    formatter: Option<Arc<dyn Formatter>>,
}

impl ConsoleAppender {
    pub fn new() -> Self {
        Self::with_colors(cfg!(feature = "console"))
    }

    pub fn with_colors(use_colors: bool) -> Self {
        Self {
            use_colors,
            formatter: None,
        }
    }

    /// Use a default formatter with the given layout instead of the logger's
    ///
    /// ```
    /// use entry_logger::appenders::ConsoleAppender;
    /// use entry_logger::OutputFormat;
    ///
    /// let appender = ConsoleAppender::new().with_output_format(OutputFormat::Json);
    /// ```
    #[must_use]
    pub fn with_output_format(self, format: OutputFormat) -> Self {
        self.with_formatter(FormatterConfig::new().with_output_format(format))
    }

    /// Use `formatter` instead of the logger's
    #[must_use]
    pub fn with_formatter<F: Formatter + 'static>(mut self, formatter: F) -> Self {
        self.formatter = Some(Arc::new(formatter));
        self
    }

    #[cfg(feature = "console")]
    fn paint(&self, line: String, level: LogLevel, colorable: bool) -> String {
        if self.use_colors && colorable {
            line.color(level.color_code()).to_string()
        } else {
            line
        }
    }

    #[cfg(not(feature = "console"))]
    fn paint(&self, line: String, _level: LogLevel, _colorable: bool) -> String {
        line
    }
}

impl Default for ConsoleAppender {
    fn default() -> Self {
        Self::new()
    }
}

impl Appender for ConsoleAppender {
    fn append(&mut self, entry: &LogEntry, formatter: &dyn Formatter) -> Result<()> {
        let formatter: &dyn Formatter = match &self.formatter {
            Some(own) => own.as_ref(),
            None => formatter,
        };
        let mut line = String::new();
        formatter.format(entry, &mut line)?;
        let output = self.paint(line, entry.level, formatter.supports_color());

        // Route Error and Fatal levels to stderr, others to stdout
        match entry.level {
            LogLevel::Error | LogLevel::Fatal => eprintln!("{}", output),
            _ => println!("{}", output),
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        use std::io::Write;
        std::io::stdout().flush()?;
        std::io::stderr().flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        "console"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_console_append_all_levels() {
        let mut appender = ConsoleAppender::with_colors(false);
        let formatter = FormatterConfig::default();
        for level in [LogLevel::Info, LogLevel::Warn, LogLevel::Error, LogLevel::Fatal] {
            let entry = LogEntry::new(level, "console check".to_string());
            appender.append(&entry, &formatter).expect("append");
        }
        appender.flush().expect("flush");
    }

    #[test]
    fn test_json_output_is_never_painted() {
        let appender = ConsoleAppender::with_colors(true).with_output_format(OutputFormat::Json);
        let formatter = appender.formatter.as_deref().expect("own formatter");
        assert!(!formatter.supports_color());
        assert_eq!(
            appender.paint("{}".to_string(), LogLevel::Error, formatter.supports_color()),
            "{}"
        );
    }
}
