//! # Entry Logger
//!
//! Structured log entries built field by field, with optional call-stack
//! capture, emitted through a synchronous multi-appender logger.
//!
//! ## Features
//!
//! - **Entry builder**: attach fields, errors, and a filtered callstack, then
//!   emit once at a chosen severity
//! - **Call sites on errors**: errors wrapped with [`with_stack!`] render a
//!   `stacktrace="file:function:line"` token
//! - **Pluggable output**: text, logfmt, or JSON formatting to console, file,
//!   or memory appenders
//! - **Testable fatal path**: fatal emission terminates through a replaceable
//!   exit hook
//!
//! ## Example
//!
//! ```
//! use entry_logger::prelude::*;
//! use std::io;
//!
//! let memory = MemoryAppender::new();
//! let records = memory.handle();
//! let logger = Logger::builder().appender(memory).build();
//!
//! let err = io::Error::new(io::ErrorKind::ConnectionRefused, "refused");
//! let mut entry = logger.callstack(Some(&err));
//! entry.add_field("peer", "10.0.0.7:5432");
//! entry.error("database unreachable");
//!
//! assert_eq!(records.len(), 1);
//! ```

pub mod appenders;
pub mod core;
pub mod macros;

use std::error::Error;
use std::sync::OnceLock;

pub mod prelude {
    pub use crate::appenders::{ConsoleAppender, MemoryAppender, MemoryRecords};
    #[cfg(feature = "file")]
    pub use crate::appenders::FileAppender;
    pub use crate::core::{
        Appender, CallSite, Entry, ErrorValue, FieldValue, Formatter, FormatterConfig, Frame,
        FrameFilter, FrameSource, LogContext, LogEntry, LogLevel, Logger, LoggerBuilder,
        LoggerError, OutputFormat, Result, StackError, TimestampFormat,
    };
}

#[cfg(feature = "file")]
pub use appenders::FileAppender;
pub use appenders::{ConsoleAppender, MemoryAppender, MemoryRecords};
pub use core::{
    Appender, BacktraceSource, CallSite, Entry, ErrorValue, ExitHook, FieldValue, Formatter,
    FormatterConfig, Frame, FrameFilter, FrameSource, LogContext, LogEntry, LogLevel, Logger,
    LoggerBuilder, LoggerError, OutputFormat, Result, StackError, TimestampFormat,
    CALLSTACK_FIELD, ERROR_FIELD, FATAL_EXIT_CODE,
};

static DEFAULT_LOGGER: OnceLock<Logger> = OnceLock::new();

/// Install the process-wide default logger
///
/// Must be called before the first use of [`default_logger`]; the default
/// logger cannot be replaced once set.
pub fn init_default_logger(logger: Logger) -> Result<()> {
    DEFAULT_LOGGER
        .set(logger)
        .map_err(|_| LoggerError::config("default logger", "already initialized"))
}

/// The process-wide default logger
///
/// If none was installed, a console logger at `Info` is created on first use.
pub fn default_logger() -> &'static Logger {
    DEFAULT_LOGGER.get_or_init(|| Logger::builder().appender(ConsoleAppender::new()).build())
}

/// Create an empty entry on the default logger
pub fn new_entry() -> Entry<'static> {
    default_logger().entry()
}

/// Create an entry on the default logger with the caller's callstack and,
/// when given, an `err` field
#[inline(never)]
pub fn callstack(err: Option<&(dyn Error + 'static)>) -> Entry<'static> {
    Entry::with_callstack(default_logger(), err)
}
