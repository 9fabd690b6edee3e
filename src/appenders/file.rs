//! File appender implementation

use crate::core::{Appender, Formatter, LogEntry, LoggerError, Result};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::sync::Arc;

/// Appends one formatted line per entry to a file
///
/// Lines use the logger's formatter unless one is set with
/// [`with_formatter`](Self::with_formatter).
pub struct FileAppender {
    writer: Option<BufWriter<File>>,
    formatter: Option<Arc<dyn Formatter>>,
}

impl FileAppender {
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| LoggerError::writer(format!("cannot open '{}': {}", path.display(), e)))?;

        Ok(Self {
            writer: Some(BufWriter::new(file)),
            formatter: None,
        })
    }

    /// Use `formatter` instead of the logger's
    ///
    /// ```no_run
    /// use entry_logger::appenders::FileAppender;
    /// use entry_logger::{FormatterConfig, OutputFormat};
    ///
    /// let appender = FileAppender::new("/var/log/app.log")
    ///     .unwrap()
    ///     .with_formatter(FormatterConfig::new().with_output_format(OutputFormat::Json));
    /// ```
    #[must_use]
    pub fn with_formatter<F: Formatter + 'static>(mut self, formatter: F) -> Self {
        self.formatter = Some(Arc::new(formatter));
        self
    }
}

impl Appender for FileAppender {
    fn append(&mut self, entry: &LogEntry, formatter: &dyn Formatter) -> Result<()> {
        let writer = self
            .writer
            .as_mut()
            .ok_or_else(|| LoggerError::writer("File writer not initialized"))?;

        let mut output = String::new();
        let formatter: &dyn Formatter = match &self.formatter {
            Some(own) => own.as_ref(),
            None => formatter,
        };
        formatter.format(entry, &mut output)?;
        output.push('\n');

        writer.write_all(output.as_bytes())?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        if let Some(ref mut writer) = self.writer {
            writer.flush()?;
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "file"
    }
}

impl Drop for FileAppender {
    fn drop(&mut self) {
        // Ensure all buffered data is flushed to disk
        let _ = self.flush();
    }
}
