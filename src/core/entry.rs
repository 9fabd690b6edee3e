//! Entry builder: accumulate fields for one log event, then emit it
//!
//! An [`Entry`] is a short-lived, single-use builder bound to a [`Logger`].
//! Fields are attached with the `add_*` methods; emitting consumes the
//! entry, so it cannot be reused afterwards.
//!
//! # Example
//!
//! ```
//! use entry_logger::prelude::*;
//!
//! let memory = MemoryAppender::new();
//! let records = memory.handle();
//! let logger = Logger::builder().appender(memory).build();
//!
//! let mut entry = logger.entry();
//! entry
//!     .add_field("user_id", 42)
//!     .add_field("route", "/login")
//!     .add_callstack();
//! entry.warn("slow request");
//!
//! assert_eq!(records.len(), 1);
//! ```

use super::callstack::{format_callstack, BacktraceSource, FrameSource};
use super::log_context::{FieldValue, LogContext};
use super::log_entry::LogEntry;
use super::log_level::LogLevel;
use super::logger::{Logger, FATAL_EXIT_CODE};
use std::error::Error;
use std::fmt;

/// Field name of a captured callstack
pub const CALLSTACK_FIELD: &str = "callstack";

/// Field name used by [`Entry::add_error`]
pub const ERROR_FIELD: &str = "err";

/// One in-progress log record
///
/// Not meant to be shared across threads; the logger it emits to is.
#[derive(Clone)]
pub struct Entry<'a> {
    logger: &'a Logger,
    context: LogContext,
}

impl<'a> Entry<'a> {
    /// Create an entry with no fields
    pub fn new(logger: &'a Logger) -> Self {
        Self {
            logger,
            context: LogContext::new(),
        }
    }

    /// Create an entry with the caller's callstack already attached, plus
    /// an `err` field when `err` is given
    #[inline(never)]
    pub fn with_callstack(logger: &'a Logger, err: Option<&(dyn Error + 'static)>) -> Self {
        let mut entry = Self::new(logger);
        entry.add_callstack();
        if let Some(err) = err {
            entry.add_error(err);
        }
        entry
    }

    /// Attach a field, replacing any previous value with the same name
    pub fn add_field<K, V>(&mut self, key: K, value: V) -> &mut Self
    where
        K: Into<String>,
        V: Into<FieldValue>,
    {
        self.context.add_field(key, value);
        self
    }

    /// Attach every field yielded by `fields`
    ///
    /// Accepts maps, vectors of pairs, or another [`LogContext`]. When two
    /// pairs share a name, the one yielded last wins.
    pub fn add_fields<I, K, V>(&mut self, fields: I) -> &mut Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<FieldValue>,
    {
        self.context.extend(fields);
        self
    }

    /// Attach the caller's callstack as the `callstack` field
    ///
    /// Frames of this crate are never included; the first token is the
    /// caller of this method. Frames excluded by the logger's
    /// [`FrameFilter`](super::callstack::FrameFilter) are dropped, and the
    /// field holds an empty string if nothing survives.
    #[inline(never)]
    pub fn add_callstack(&mut self) -> &mut Self {
        self.add_callstack_skip(0)
    }

    /// Like [`add_callstack`](Self::add_callstack), but also skips the
    /// `skip` innermost caller frames, for use from logging helpers
    #[inline(never)]
    pub fn add_callstack_skip(&mut self, skip: usize) -> &mut Self {
        let source = BacktraceSource::capture();
        self.add_callstack_from(&source, skip)
    }

    /// Render the frames of `source`, starting at `skip`, into the
    /// `callstack` field
    pub fn add_callstack_from<S>(&mut self, source: &S, skip: usize) -> &mut Self
    where
        S: FrameSource + ?Sized,
    {
        let rendered = format_callstack(source, skip, self.logger.frame_filter());
        self.add_field(CALLSTACK_FIELD, rendered)
    }

    /// Attach `err` as the `err` field
    ///
    /// Same as `add_field("err", FieldValue::from_error(err))`.
    pub fn add_error(&mut self, err: &(dyn Error + 'static)) -> &mut Self {
        self.add_field(ERROR_FIELD, FieldValue::from_error(err))
    }

    /// Fields attached so far
    pub fn fields(&self) -> &LogContext {
        &self.context
    }

    /// Logger this entry emits to
    pub fn logger(&self) -> &'a Logger {
        self.logger
    }

    fn emit(self, level: LogLevel, message: String) {
        self.logger.log_with_context(level, message, self.context);
    }

    /// Emit at debug severity
    pub fn debug(self, message: impl Into<String>) {
        self.emit(LogLevel::Debug, message.into());
    }

    /// Emit at debug severity with a formatted message; see [`debug!`](crate::debug)
    pub fn debugf(self, args: fmt::Arguments<'_>) {
        self.emit(LogLevel::Debug, fmt::format(args));
    }

    /// Emit at info severity
    pub fn info(self, message: impl Into<String>) {
        self.emit(LogLevel::Info, message.into());
    }

    /// Emit at info severity with a formatted message; see [`info!`](crate::info)
    pub fn infof(self, args: fmt::Arguments<'_>) {
        self.emit(LogLevel::Info, fmt::format(args));
    }

    /// Emit at warn severity
    pub fn warn(self, message: impl Into<String>) {
        self.emit(LogLevel::Warn, message.into());
    }

    /// Emit at warn severity with a formatted message; see [`warn!`](crate::warn)
    pub fn warnf(self, args: fmt::Arguments<'_>) {
        self.emit(LogLevel::Warn, fmt::format(args));
    }

    /// Emit at error severity
    pub fn error(self, message: impl Into<String>) {
        self.emit(LogLevel::Error, message.into());
    }

    /// Emit at error severity with a formatted message; see [`error!`](crate::error)
    pub fn errorf(self, args: fmt::Arguments<'_>) {
        self.emit(LogLevel::Error, fmt::format(args));
    }

    /// Emit at fatal severity, then terminate the process with status 1
    ///
    /// Termination goes through the logger's exit hook and never returns.
    /// Destructors of live values do not run.
    pub fn fatal(self, message: impl Into<String>) -> ! {
        let logger = self.logger;
        self.emit(LogLevel::Fatal, message.into());
        logger.exit(FATAL_EXIT_CODE)
    }

    /// Formatted form of [`fatal`](Self::fatal); see [`fatal!`](crate::fatal)
    pub fn fatalf(self, args: fmt::Arguments<'_>) -> ! {
        self.fatal(fmt::format(args))
    }

    /// Render the entry with the logger's formatter without emitting it
    ///
    /// Never fails: if the formatter errors, the partial output is returned
    /// followed by ` - <error>`.
    pub fn render(&self) -> String {
        let record = LogEntry::new(LogLevel::Info, String::new()).with_context(self.context.clone());
        let mut out = String::new();
        match self.logger.format(&record, &mut out) {
            Ok(()) => out,
            Err(e) => format!("{} - <{}>", out, e),
        }
    }
}

impl fmt::Display for Entry<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl fmt::Debug for Entry<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entry").field("context", &self.context).finish()
    }
}

impl Logger {
    /// Create an empty entry bound to this logger
    pub fn entry(&self) -> Entry<'_> {
        Entry::new(self)
    }

    /// Create an entry with the caller's callstack and an optional error
    #[inline(never)]
    pub fn callstack(&self, err: Option<&(dyn Error + 'static)>) -> Entry<'_> {
        Entry::with_callstack(self, err)
    }
}
