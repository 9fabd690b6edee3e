//! Formatting macros for entry emission and error wrapping.
//!
//! The level macros take an [`Entry`](crate::Entry) and `format!`-style
//! arguments and emit the entry at that level.
//!
//! # Examples
//!
//! ```
//! use entry_logger::prelude::*;
//! use entry_logger::info;
//!
//! let logger = Logger::new();
//!
//! let mut entry = logger.entry();
//! entry.add_field("port", 8080);
//! info!(entry, "Server listening on port {}", 8080);
//! ```

/// Emit an entry at the given level with a formatted message.
///
/// # Examples
///
/// ```
/// # use entry_logger::prelude::*;
/// # let logger = Logger::new();
/// use entry_logger::log;
/// log!(logger.entry(), LogLevel::Error, "Error code: {}", 500);
/// ```
#[macro_export]
macro_rules! log {
    ($entry:expr, $level:expr, $($arg:tt)+) => {
        match $level {
            $crate::LogLevel::Trace | $crate::LogLevel::Debug => $entry.debugf(format_args!($($arg)+)),
            $crate::LogLevel::Info => $entry.infof(format_args!($($arg)+)),
            $crate::LogLevel::Warn => $entry.warnf(format_args!($($arg)+)),
            $crate::LogLevel::Error => $entry.errorf(format_args!($($arg)+)),
            $crate::LogLevel::Fatal => $entry.fatalf(format_args!($($arg)+)),
        }
    };
}

/// Emit an entry at debug level.
#[macro_export]
macro_rules! debug {
    ($entry:expr, $($arg:tt)+) => {
        $entry.debugf(format_args!($($arg)+))
    };
}

/// Emit an entry at info level.
///
/// ```
/// # use entry_logger::prelude::*;
/// # let logger = Logger::new();
/// use entry_logger::info;
/// info!(logger.entry(), "Processing {} items", 100);
/// ```
#[macro_export]
macro_rules! info {
    ($entry:expr, $($arg:tt)+) => {
        $entry.infof(format_args!($($arg)+))
    };
}

/// Emit an entry at warn level.
#[macro_export]
macro_rules! warn {
    ($entry:expr, $($arg:tt)+) => {
        $entry.warnf(format_args!($($arg)+))
    };
}

/// Emit an entry at error level.
///
/// ```
/// # use entry_logger::prelude::*;
/// # let logger = Logger::new();
/// use entry_logger::error;
/// let mut entry = logger.entry();
/// entry.add_field("code", 500);
/// error!(entry, "Failed to connect to {}", "db-1");
/// ```
#[macro_export]
macro_rules! error {
    ($entry:expr, $($arg:tt)+) => {
        $entry.errorf(format_args!($($arg)+))
    };
}

/// Emit an entry at fatal level, then terminate through the logger's exit hook.
#[macro_export]
macro_rules! fatal {
    ($entry:expr, $($arg:tt)+) => {
        $entry.fatalf(format_args!($($arg)+))
    };
}

/// Fully qualified path of the enclosing function.
#[doc(hidden)]
#[macro_export]
macro_rules! function_name {
    () => {{
        fn f() {}
        fn type_name_of<T>(_: T) -> &'static str {
            ::std::any::type_name::<T>()
        }
        let name = type_name_of(f);
        name.strip_suffix("::f").unwrap_or(name)
    }};
}

/// Wrap an error in a [`StackError`](crate::StackError) recording the
/// current file, function, and line.
///
/// ```
/// use entry_logger::with_stack;
/// use std::io;
///
/// fn read_header() -> Result<(), entry_logger::StackError> {
///     Err(with_stack!(io::Error::new(io::ErrorKind::UnexpectedEof, "EOF")))
/// }
///
/// let err = read_header().unwrap_err();
/// assert_eq!(err.call_site().function, "read_header");
/// ```
#[macro_export]
macro_rules! with_stack {
    ($err:expr) => {
        $crate::StackError::new(
            $err,
            $crate::CallSite::new(file!(), $crate::function_name!(), line!()),
        )
    };
}
