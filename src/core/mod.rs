//! Core logger types and traits

pub mod appender;
pub mod callstack;
pub mod entry;
pub mod error;
pub mod log_context;
pub mod log_entry;
pub mod log_level;
pub mod logger;
pub mod output_format;
pub mod stack_error;
pub mod timestamp;

pub use appender::Appender;
pub use callstack::{BacktraceSource, Frame, FrameFilter, FrameSource};
pub use entry::{Entry, CALLSTACK_FIELD, ERROR_FIELD};
pub use error::{LoggerError, Result};
pub use log_context::{FieldValue, LogContext};
pub use log_entry::LogEntry;
pub use log_level::LogLevel;
pub use logger::{ExitHook, Logger, LoggerBuilder, FATAL_EXIT_CODE};
pub use output_format::{Formatter, OutputFormat};
pub use stack_error::{CallSite, ErrorValue, StackError};
pub use timestamp::{FormatterConfig, TimestampFormat};
