//! Integration tests for entry building and emission
//!
//! These tests verify:
//! - Error call sites render as stacktrace tokens
//! - Real callstack capture starts at the caller
//! - Fatal emission writes once and then exits through the hook
//! - Entries reach file appenders intact
//! - The process-wide default logger

use entry_logger::prelude::*;
use entry_logger::{callstack, init_default_logger, new_entry, with_stack, CALLSTACK_FIELD};
use std::fs;
use std::io;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicI32, AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::TempDir;

fn text_logger() -> (Logger, MemoryRecords) {
    let memory = MemoryAppender::new();
    let records = memory.handle();
    let logger = Logger::builder()
        .formatter(
            FormatterConfig::new()
                .with_include_timestamp(false)
                .with_include_thread_id(false),
        )
        .appender(memory)
        .build();
    (logger, records)
}

fn callstack_value(entry: &Entry<'_>) -> String {
    match entry.fields().get(CALLSTACK_FIELD) {
        Some(FieldValue::String(s)) => s.clone(),
        other => panic!("Expected callstack string, got {:?}", other),
    }
}

#[test]
fn test_add_error_records_call_site() {
    let (logger, _records) = text_logger();
    let mut entry = logger.entry();

    let (err, line) = (with_stack!(io::Error::new(io::ErrorKind::UnexpectedEof, "EOF")), line!());
    entry.add_error(&err);

    let want = format!(
        "stacktrace=\"tests/entry_tests.rs:test_add_error_records_call_site:{}\"",
        line
    );
    let actual = entry.render();
    assert!(
        actual.contains(&want),
        "could not find expected callstack string: '{}'\ngot:\n\t{}",
        want,
        actual
    );
    assert!(actual.contains("err=EOF"));
}

#[test]
fn test_add_callstack_starts_at_caller() {
    let (logger, _records) = text_logger();
    let mut entry = logger.entry();

    let line = { entry.add_callstack(); line!() };

    let stack = callstack_value(&entry);
    let expected_head = format!("tests/entry_tests.rs:{}", line);
    assert!(
        stack.starts_with(&expected_head),
        "callstack should start at the caller ({}), got: {}",
        expected_head,
        stack
    );
    assert!(!stack.contains("core/entry.rs"));
    assert!(!stack.contains("core/callstack.rs"));
    for token in stack.split(", ") {
        assert!(token.rsplit_once(':').is_some(), "malformed token: {}", token);
    }
}

#[test]
fn test_callstack_constructor_reports_caller() {
    let (logger, _records) = text_logger();
    let err = io::Error::new(io::ErrorKind::ConnectionReset, "reset by peer");

    let (entry, line) = (logger.callstack(Some(&err)), line!());

    assert!(callstack_value(&entry).starts_with(&format!("tests/entry_tests.rs:{}", line)));
    let rendered = entry.render();
    assert!(rendered.contains("err=\"reset by peer\""));
}

#[test]
fn test_callstack_constructor_without_error() {
    let (logger, _records) = text_logger();
    let entry = logger.callstack(None);

    assert!(entry.fields().get("err").is_none());
    assert!(entry.fields().get(CALLSTACK_FIELD).is_some());
}

#[test]
fn test_add_callstack_skip_drops_helper_frame() {
    #[inline(never)]
    fn log_helper(logger: &Logger) -> Entry<'_> {
        let mut entry = logger.entry();
        entry.add_callstack_skip(1);
        entry
    }

    let (logger, _records) = text_logger();
    let (entry, line) = (log_helper(&logger), line!());

    let stack = callstack_value(&entry);
    assert!(
        stack.starts_with(&format!("tests/entry_tests.rs:{}", line)),
        "helper frame should be skipped, got: {}",
        stack
    );
}

#[test]
fn test_emission_carries_fields() {
    let (logger, records) = text_logger();

    let mut entry = logger.entry();
    entry
        .add_field("user_id", 12345)
        .add_field("request_id", "abc-def-ghi")
        .add_error(&io::Error::new(io::ErrorKind::PermissionDenied, "denied"));
    entry.error("login rejected");

    let entries = records.entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].level, LogLevel::Error);
    assert_eq!(entries[0].message, "login rejected");

    let context = entries[0].context.as_ref().expect("fields attached");
    assert_eq!(context.get("user_id"), Some(&FieldValue::Int(12345)));
    assert_eq!(
        context.get("request_id"),
        Some(&FieldValue::String("abc-def-ghi".to_string()))
    );
    assert!(matches!(context.get("err"), Some(FieldValue::Error(e)) if e.message == "denied"));
}

#[test]
fn test_emission_respects_threshold() {
    let memory = MemoryAppender::new();
    let records = memory.handle();
    let logger = Logger::builder()
        .min_level(LogLevel::Warn)
        .appender(memory)
        .build();

    logger.entry().debug("Debug message");
    logger.entry().info("Info message");
    logger.entry().warn("Warn message");
    logger.entry().error("Error message");

    let messages: Vec<String> = records.entries().into_iter().map(|e| e.message).collect();
    assert_eq!(messages, vec!["Warn message", "Error message"]);
}

#[test]
#[allow(unreachable_code)]
fn test_fatal_emits_once_then_exits() {
    let exits = Arc::new(AtomicUsize::new(0));
    let status = Arc::new(AtomicI32::new(0));
    let (exits_hook, status_hook) = (Arc::clone(&exits), Arc::clone(&status));

    let memory = MemoryAppender::new();
    let records = memory.handle();
    let logger = Logger::builder()
        .appender(memory)
        .exit_hook(move |code| {
            exits_hook.fetch_add(1, Ordering::SeqCst);
            status_hook.store(code, Ordering::SeqCst);
            panic!("process exit requested")
        })
        .build();

    let after_exit = AtomicBool::new(false);
    let result = catch_unwind(AssertUnwindSafe(|| {
        let mut entry = logger.entry();
        entry.add_field("reason", "out_of_memory");
        entry.fatal("x");
        after_exit.store(true, Ordering::SeqCst);
    }));

    assert!(result.is_err());
    assert!(!after_exit.load(Ordering::SeqCst), "code after fatal must not run");
    assert_eq!(exits.load(Ordering::SeqCst), 1);
    assert_ne!(status.load(Ordering::SeqCst), 0);

    let entries = records.entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].level, LogLevel::Fatal);
    assert_eq!(entries[0].message, "x");
}

#[test]
fn test_fatalf_formats_message() {
    let memory = MemoryAppender::new();
    let records = memory.handle();
    let logger = Logger::builder()
        .appender(memory)
        .exit_hook(|code| panic!("exit {}", code))
        .build();

    let result = catch_unwind(AssertUnwindSafe(|| {
        logger.entry().fatalf(format_args!("shard {} lost", 7))
    }));

    assert!(result.is_err());
    assert_eq!(records.entries()[0].message, "shard 7 lost");
}

#[test]
fn test_structured_entry_to_file() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = temp_dir.path().join("entries.log");

    let appender = FileAppender::new(&log_file).expect("Failed to create appender");
    let logger = Logger::builder().appender(appender).build();

    let mut entry = logger.entry();
    entry.add_field("ip_address", "192.168.1.1").add_field("attempts", 3);
    entry.warn("User login\nERROR fake line");

    logger.flush().expect("Failed to flush");

    let content = fs::read_to_string(&log_file).expect("Failed to read log file");
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 1, "Log should be a single line");
    assert!(lines[0].contains("[WARN ]"));
    assert!(lines[0].contains("User login\\nERROR fake line"));
    assert!(lines[0].contains("attempts=3 ip_address=192.168.1.1"));
}

#[test]
fn test_field_line_breaks_stay_on_one_line() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = temp_dir.path().join("injection.log");

    let appender = FileAppender::new(&log_file).expect("Failed to create appender");
    let logger = Logger::builder().appender(appender).build();

    let mut entry = logger.entry();
    entry.add_field("user", "bob\n[2025-01-01T00:00:00.000Z] [ERROR] main - forged\r");
    entry.info("login");

    logger.flush().expect("Failed to flush");

    let content = fs::read_to_string(&log_file).expect("Failed to read log file");
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 1, "Log should be a single line: {:?}", content);
    assert!(lines[0].contains(r#"user="bob\n[2025-01-01T00:00:00.000Z] [ERROR] main - forged\r""#));
}

#[test]
fn test_emitted_line_matches_render() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = temp_dir.path().join("entries.jsonl");

    let appender = FileAppender::new(&log_file).expect("Failed to create appender");
    let logger = Logger::builder()
        .formatter(
            FormatterConfig::new()
                .with_output_format(OutputFormat::Json)
                .with_include_timestamp(false)
                .with_include_thread_id(false),
        )
        .appender(appender)
        .build();

    let mut entry = logger.entry();
    entry.add_field("a", 1);
    let rendered: serde_json::Value =
        serde_json::from_str(&entry.render()).expect("render is json");
    entry.info("hi");
    logger.flush().expect("Failed to flush");

    let content = fs::read_to_string(&log_file).expect("Failed to read log file");
    let emitted: serde_json::Value =
        serde_json::from_str(content.trim_end()).expect("emitted line is json");
    assert_eq!(emitted["a"], rendered["a"]);
    assert_eq!(emitted["level"], rendered["level"]);
    assert_eq!(emitted["message"], "hi");
}

#[test]
fn test_json_user_stacktrace_does_not_replace_call_site() {
    let logger = Logger::builder().output_format(OutputFormat::Json).build();
    let mut entry = logger.entry();
    let (err, line) = (with_stack!("boom"), line!());
    entry.add_error(&err).add_field("stacktrace", "user-value");

    let parsed: serde_json::Value = serde_json::from_str(&entry.render()).expect("valid json");
    assert_eq!(
        parsed["stacktrace"],
        format!(
            "tests/entry_tests.rs:test_json_user_stacktrace_does_not_replace_call_site:{}",
            line
        )
    );
    assert_eq!(parsed["fields.stacktrace"], "user-value");
}

#[test]
fn test_json_render_of_error_with_site() {
    let logger = Logger::builder().output_format(OutputFormat::Json).build();
    let mut entry = logger.entry();
    let (err, line) = (with_stack!("checksum mismatch"), line!());
    entry.add_error(&err);

    let parsed: serde_json::Value = serde_json::from_str(&entry.render()).expect("valid json");
    assert_eq!(parsed["err"], "checksum mismatch");
    assert_eq!(
        parsed["stacktrace"],
        format!("tests/entry_tests.rs:test_json_render_of_error_with_site:{}", line)
    );
}

#[test]
fn test_default_logger_initialized_once() {
    let memory = MemoryAppender::new();
    let records = memory.handle();
    let logger = Logger::builder().appender(memory).build();

    init_default_logger(logger).expect("first initialization succeeds");
    let second = init_default_logger(Logger::new());
    assert!(matches!(second, Err(LoggerError::InvalidConfiguration { .. })));

    let mut entry = new_entry();
    entry.add_field("component", "scheduler");
    entry.info("default logger in use");

    let err = io::Error::new(io::ErrorKind::TimedOut, "timed out");
    callstack(Some(&err)).warn("with stack");

    let entries = records.entries();
    assert_eq!(entries.len(), 2);
    let stack_fields = entries[1].context.as_ref().expect("fields attached");
    assert!(stack_fields.get(CALLSTACK_FIELD).is_some());
    assert!(stack_fields.get("err").is_some());
}
