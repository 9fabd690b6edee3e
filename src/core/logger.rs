//! Main logger implementation
//!
//! `Logger` is the collaborator every [`Entry`](super::entry::Entry) delegates
//! to: it owns the severity threshold, the formatter used for inspection,
//! the output appenders, the callstack filter, and the exit hook used by
//! fatal emission. Emission is synchronous and safe to call from many
//! threads at once.

use super::{
    appender::Appender,
    callstack::FrameFilter,
    error::Result,
    log_context::LogContext,
    log_entry::LogEntry,
    log_level::LogLevel,
    output_format::{Formatter, OutputFormat},
    timestamp::FormatterConfig,
};
use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Process termination hook used by fatal emission
///
/// Defaults to [`std::process::exit`]. Test hooks typically record the
/// status and panic; if a hook returns, the process exits anyway.
pub type ExitHook = Arc<dyn Fn(i32) + Send + Sync>;

/// Exit status used by fatal emission
pub const FATAL_EXIT_CODE: i32 = 1;

pub struct Logger {
    min_level: RwLock<LogLevel>,
    appenders: RwLock<Vec<Box<dyn Appender>>>,
    formatter: Arc<dyn Formatter>,
    frame_filter: FrameFilter,
    exit_hook: ExitHook,
    /// Entries that at least one appender failed to write
    dropped: AtomicU64,
}

impl Logger {
    #[must_use]
    pub fn new() -> Self {
        Self {
            min_level: RwLock::new(LogLevel::Info),
            appenders: RwLock::new(Vec::new()),
            formatter: Arc::new(FormatterConfig::default()),
            frame_filter: FrameFilter::default(),
            exit_hook: Arc::new(|code| std::process::exit(code)),
            dropped: AtomicU64::new(0),
        }
    }

    /// Deliver an entry to every appender with per-appender panic isolation
    ///
    /// One failing appender never prevents the others from receiving the
    /// entry. Returns `true` if any appender failed.
    fn process_sync(
        appenders: &mut [Box<dyn Appender>],
        entry: &LogEntry,
        formatter: &dyn Formatter,
    ) -> bool {
        let mut has_error = false;

        for (idx, appender) in appenders.iter_mut().enumerate() {
            let append_result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                appender.append(entry, formatter)
            }));

            match append_result {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    eprintln!(
                        "[LOGGER ERROR] Appender #{} ({}) failed: {}",
                        idx,
                        appender.name(),
                        e
                    );
                    has_error = true;
                }
                Err(panic_info) => {
                    eprintln!(
                        "[LOGGER CRITICAL] Appender #{} panicked: {}. \
                         Other appenders continue to function.",
                        idx,
                        panic_message(panic_info.as_ref())
                    );
                    has_error = true;
                }
            }
        }

        has_error
    }

    pub fn add_appender(&self, appender: Box<dyn Appender>) {
        self.appenders.write().push(appender);
    }

    pub fn set_min_level(&self, level: LogLevel) {
        *self.min_level.write() = level;
    }

    pub fn min_level(&self) -> LogLevel {
        *self.min_level.read()
    }

    #[inline]
    pub fn is_enabled(&self, level: LogLevel) -> bool {
        level >= self.min_level()
    }

    /// Filter applied to captured callstacks
    pub fn frame_filter(&self) -> &FrameFilter {
        &self.frame_filter
    }

    pub fn log(&self, level: LogLevel, message: impl Into<String>) {
        if !self.is_enabled(level) {
            return;
        }

        self.send_entry(LogEntry::new(level, message.into()));
    }

    /// Log with structured context fields
    pub fn log_with_context(
        &self,
        level: LogLevel,
        message: impl Into<String>,
        context: LogContext,
    ) {
        if !self.is_enabled(level) {
            return;
        }

        let entry = LogEntry::new(level, message.into()).with_context(context);
        self.send_entry(entry);
    }

    fn send_entry(&self, entry: LogEntry) {
        let mut appenders = self.appenders.write();
        if Self::process_sync(&mut appenders, &entry, self.formatter.as_ref()) {
            self.dropped.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Render an entry with this logger's formatter without emitting it
    pub fn format(&self, entry: &LogEntry, out: &mut String) -> Result<()> {
        self.formatter.format(entry, out)
    }

    /// Number of entries at least one appender failed to write
    pub fn dropped_count(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    pub fn flush(&self) -> Result<()> {
        let mut appenders = self.appenders.write();
        for appender in appenders.iter_mut() {
            appender.flush()?;
        }
        Ok(())
    }

    /// Flush all appenders and terminate the process through the exit hook
    ///
    /// This is a hard, non-cancelable exit: destructors of live values and
    /// other cleanup code do not run. A hook that returns is followed by
    /// [`std::process::exit`] with the same status.
    pub fn exit(&self, code: i32) -> ! {
        if let Err(e) = self.flush() {
            eprintln!("[LOGGER ERROR] Failed to flush before exit: {}", e);
        }
        (self.exit_hook)(code);
        eprintln!("[LOGGER WARNING] Exit hook returned; exiting with status {}", code);
        std::process::exit(code)
    }
}

fn panic_message(panic_info: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic_info.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic_info.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        if let Err(e) = self.flush() {
            eprintln!("[LOGGER ERROR] Failed to flush during shutdown: {}", e);
        }

        let dropped = self.dropped_count();
        if dropped > 0 {
            eprintln!(
                "[LOGGER WARNING] Logger shutting down with {} entries that failed to write",
                dropped
            );
        }
    }
}

/// Builder for constructing Logger with a fluent API
///
/// # Example
/// ```
/// use entry_logger::prelude::*;
///
/// let logger = Logger::builder()
///     .min_level(LogLevel::Debug)
///     .appender(MemoryAppender::new())
///     .output_format(OutputFormat::Logfmt)
///     .frame_filter(FrameFilter::default().exclude_prefix("generated/"))
///     .build();
/// ```
pub struct LoggerBuilder {
    min_level: LogLevel,
    appenders: Vec<Box<dyn Appender>>,
    formatter: Arc<dyn Formatter>,
    frame_filter: FrameFilter,
    exit_hook: Option<ExitHook>,
}

impl LoggerBuilder {
    pub fn new() -> Self {
        Self {
            min_level: LogLevel::Info,
            appenders: Vec::new(),
            formatter: Arc::new(FormatterConfig::default()),
            frame_filter: FrameFilter::default(),
            exit_hook: None,
        }
    }

    /// Set minimum log level
    #[must_use = "builder methods return a new value"]
    pub fn min_level(mut self, level: LogLevel) -> Self {
        self.min_level = level;
        self
    }

    /// Add an appender
    #[must_use = "builder methods return a new value"]
    pub fn appender<A: Appender + 'static>(mut self, appender: A) -> Self {
        self.appenders.push(Box::new(appender));
        self
    }

    /// Formatter used by [`Entry::render`](super::entry::Entry::render) and by
    /// every appender that has none of its own
    #[must_use = "builder methods return a new value"]
    pub fn formatter<F: Formatter + 'static>(mut self, formatter: F) -> Self {
        self.formatter = Arc::new(formatter);
        self
    }

    /// Shorthand for a default `FormatterConfig` with the given layout
    #[must_use = "builder methods return a new value"]
    pub fn output_format(self, format: OutputFormat) -> Self {
        self.formatter(FormatterConfig::new().with_output_format(format))
    }

    #[must_use = "builder methods return a new value"]
    pub fn frame_filter(mut self, filter: FrameFilter) -> Self {
        self.frame_filter = filter;
        self
    }

    /// Replace the process termination used by fatal emission
    ///
    /// # Example
    ///
    /// ```
    /// use entry_logger::Logger;
    ///
    /// let logger = Logger::builder()
    ///     .exit_hook(|code| panic!("exit requested with status {}", code))
    ///     .build();
    /// ```
    #[must_use = "builder methods return a new value"]
    pub fn exit_hook<H>(mut self, hook: H) -> Self
    where
        H: Fn(i32) + Send + Sync + 'static,
    {
        self.exit_hook = Some(Arc::new(hook));
        self
    }

    /// Build the Logger
    pub fn build(self) -> Logger {
        let mut logger = Logger::new();
        logger.set_min_level(self.min_level);
        logger.formatter = self.formatter;
        logger.frame_filter = self.frame_filter;
        if let Some(hook) = self.exit_hook {
            logger.exit_hook = hook;
        }
        for appender in self.appenders {
            logger.add_appender(appender);
        }
        logger
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl Logger {
    /// Create a builder for Logger
    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }
}
