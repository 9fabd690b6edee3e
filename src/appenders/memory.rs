//! In-memory appender that records entries for inspection

use crate::core::{Appender, Formatter, LogEntry, Result};
use parking_lot::Mutex;
use std::sync::Arc;

/// Records every appended entry
///
/// Keep a [`MemoryRecords`] handle before moving the appender into a
/// logger to read what was emitted.
///
/// ```
/// use entry_logger::prelude::*;
///
/// let memory = MemoryAppender::new();
/// let records = memory.handle();
/// let logger = Logger::builder().appender(memory).build();
///
/// logger.entry().info("hello");
/// assert_eq!(records.entries()[0].message, "hello");
/// ```
#[derive(Debug, Default)]
pub struct MemoryAppender {
    records: MemoryRecords,
}

/// Shared view of the entries a [`MemoryAppender`] received
#[derive(Debug, Clone, Default)]
pub struct MemoryRecords {
    entries: Arc<Mutex<Vec<LogEntry>>>,
}

impl MemoryAppender {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle(&self) -> MemoryRecords {
        self.records.clone()
    }
}

impl MemoryRecords {
    /// Copy of all recorded entries, oldest first
    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }
}

impl Appender for MemoryAppender {
    fn append(&mut self, entry: &LogEntry, _formatter: &dyn Formatter) -> Result<()> {
        self.records.entries.lock().push(entry.clone());
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str {
        "memory"
    }
}
