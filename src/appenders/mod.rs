//! Appender implementations

pub mod console;
#[cfg(feature = "file")]
pub mod file;
pub mod memory;

pub use console::ConsoleAppender;
#[cfg(feature = "file")]
pub use file::FileAppender;
pub use memory::{MemoryAppender, MemoryRecords};

pub use crate::core::Appender;
