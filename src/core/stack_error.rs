//! Errors that remember where they were wrapped
//!
//! `StackError` pairs any error with the [`CallSite`] that wrapped it. When a
//! `StackError` (or an error whose `source()` chain contains one) is attached
//! to an entry, the call site is rendered as a `stacktrace` token next to the
//! error text.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt;

/// Source location where an error was wrapped
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallSite {
    pub file: String,
    pub function: String,
    pub line: u32,
}

impl CallSite {
    /// Build a call site from a file path, a fully qualified function path,
    /// and a line number.
    ///
    /// Only the last named segment of `function` is kept, so
    /// `my_app::db::connect::{{closure}}` becomes `connect`.
    pub fn new(file: impl Into<String>, function: &str, line: u32) -> Self {
        let function = function
            .rsplit("::")
            .find(|segment| !segment.is_empty() && !segment.starts_with("{{"))
            .unwrap_or(function);

        Self {
            file: file.into(),
            function: function.to_string(),
            line,
        }
    }
}

impl fmt::Display for CallSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.function, self.line)
    }
}

/// An error annotated with the call site that wrapped it
///
/// Usually built with the [`with_stack!`](crate::with_stack) macro.
///
/// # Example
///
/// ```
/// use entry_logger::{with_stack, StackError};
/// use std::io;
///
/// let err: StackError = with_stack!(io::Error::new(io::ErrorKind::UnexpectedEof, "EOF"));
/// assert_eq!(err.to_string(), "EOF");
/// assert!(err.call_site().file.ends_with(".rs"));
/// ```
#[derive(Debug)]
pub struct StackError {
    inner: Box<dyn Error + Send + Sync + 'static>,
    site: CallSite,
}

impl StackError {
    pub fn new<E>(err: E, site: CallSite) -> Self
    where
        E: Into<Box<dyn Error + Send + Sync + 'static>>,
    {
        Self {
            inner: err.into(),
            site,
        }
    }

    pub fn call_site(&self) -> &CallSite {
        &self.site
    }
}

impl fmt::Display for StackError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.inner, f)
    }
}

impl Error for StackError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(self.inner.as_ref())
    }
}

/// Rendered form of an error attached as a field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorValue {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub call_site: Option<CallSite>,
}

impl ErrorValue {
    /// Capture an error's text and the first call site found in its chain
    pub fn from_error(err: &(dyn Error + 'static)) -> Self {
        let mut call_site = None;
        let mut current = Some(err);
        while let Some(e) = current {
            if let Some(stack) = e.downcast_ref::<StackError>() {
                call_site = Some(stack.site.clone());
                break;
            }
            current = e.source();
        }

        Self {
            message: err.to_string(),
            call_site,
        }
    }
}

impl fmt::Display for ErrorValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[derive(Debug)]
    struct Outer(StackError);

    impl fmt::Display for Outer {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "query failed: {}", self.0)
        }
    }

    impl Error for Outer {
        fn source(&self) -> Option<&(dyn Error + 'static)> {
            Some(&self.0)
        }
    }

    #[test]
    fn test_call_site_keeps_last_named_segment() {
        let site = CallSite::new("src/db.rs", "my_app::db::connect::{{closure}}", 42);
        assert_eq!(site.function, "connect");
        assert_eq!(site.to_string(), "src/db.rs:connect:42");
    }

    #[test]
    fn test_error_value_plain_error() {
        let err = io::Error::new(io::ErrorKind::NotFound, "missing");
        let value = ErrorValue::from_error(&err);
        assert_eq!(value.message, "missing");
        assert!(value.call_site.is_none());
    }

    #[test]
    fn test_error_value_finds_site_in_chain() {
        let site = CallSite::new("src/repo.rs", "repo::load", 7);
        let wrapped = Outer(StackError::new(
            io::Error::new(io::ErrorKind::UnexpectedEof, "EOF"),
            site.clone(),
        ));

        let value = ErrorValue::from_error(&wrapped);
        assert_eq!(value.message, "query failed: EOF");
        assert_eq!(value.call_site, Some(site));
    }

    #[test]
    fn test_stack_error_source_is_inner() {
        let err = StackError::new("boom", CallSite::new("a.rs", "f", 1));
        assert_eq!(err.source().map(|e| e.to_string()), Some("boom".to_string()));
    }
}
