//! Output sinks for emitted entries

use super::{error::Result, log_entry::LogEntry, output_format::Formatter};

/// Destination for emitted log entries
///
/// A logger calls `append` once per emitted entry on every registered
/// appender, passing its own formatter. Appenders that write text use it
/// unless they were given a formatter of their own, so emitted lines match
/// [`Entry::render`](super::entry::Entry::render). Errors and panics from one
/// appender are reported on stderr and do not stop delivery to the others.
pub trait Appender: Send + Sync {
    fn append(&mut self, entry: &LogEntry, formatter: &dyn Formatter) -> Result<()>;
    fn flush(&mut self) -> Result<()>;
    /// Short name used in diagnostics
    fn name(&self) -> &str;
}
