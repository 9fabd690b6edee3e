//! Basic entry usage
//!
//! Demonstrates field accumulation, error call sites, and callstack capture
//! on a console logger.
//!
//! Run with: cargo run --example basic_usage

use entry_logger::prelude::*;
use entry_logger::{info, with_stack};
use std::io;

fn load_config(path: &str) -> std::result::Result<String, StackError> {
    Err(with_stack!(io::Error::new(
        io::ErrorKind::NotFound,
        format!("{} not found", path)
    )))
}

fn main() -> Result<()> {
    println!("=== Entry Logger - Basic Usage Example ===\n");

    let logger = Logger::builder()
        .min_level(LogLevel::Debug)
        .appender(ConsoleAppender::new())
        .build();

    println!("1. Entries with fields:");
    let mut entry = logger.entry();
    entry.add_field("user_id", 42).add_field("route", "/login");
    entry.info("request served");

    let mut entry = logger.entry();
    entry.add_field("attempt", 2);
    info!(entry, "retrying in {}ms", 250);

    println!("\n2. Errors with call sites:");
    if let Err(err) = load_config("app.toml") {
        let mut entry = logger.entry();
        entry.add_error(&err);
        entry.warn("falling back to defaults");
    }

    println!("\n3. Callstack capture:");
    let err = io::Error::new(io::ErrorKind::ConnectionRefused, "connection refused");
    logger.callstack(Some(&err)).error("database unreachable");

    println!("\n4. Rendering without emitting:");
    let mut entry = logger.entry();
    entry.add_field("queue", "billing").add_field("depth", 17);
    println!("   {}", entry);

    logger.flush()?;
    println!("\n=== Example completed successfully! ===");

    Ok(())
}
