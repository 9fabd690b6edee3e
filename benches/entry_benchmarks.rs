//! Criterion benchmarks for entry_logger

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use entry_logger::core::callstack::format_callstack;
use entry_logger::prelude::*;
use entry_logger::BacktraceSource;
use std::io;

fn quiet_logger() -> Logger {
    Logger::builder()
        .formatter(FormatterConfig::new().with_include_thread_id(false))
        .build()
}

// ============================================================================
// Entry Building Benchmarks
// ============================================================================

fn bench_entry_building(c: &mut Criterion) {
    let mut group = c.benchmark_group("entry_building");
    group.throughput(Throughput::Elements(1));

    let logger = quiet_logger();

    group.bench_function("empty", |b| {
        b.iter(|| black_box(logger.entry()));
    });

    group.bench_function("three_fields", |b| {
        b.iter(|| {
            let mut entry = logger.entry();
            entry
                .add_field("user_id", black_box(12345))
                .add_field("route", black_box("/api/orders"))
                .add_field("latency_ms", black_box(12.5));
            black_box(entry)
        });
    });

    let err = io::Error::new(io::ErrorKind::TimedOut, "upstream timed out");
    group.bench_function("with_error", |b| {
        b.iter(|| {
            let mut entry = logger.entry();
            entry.add_error(black_box(&err));
            black_box(entry)
        });
    });

    group.finish();
}

// ============================================================================
// Rendering Benchmarks
// ============================================================================

fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("render");

    for format in [OutputFormat::Text, OutputFormat::Logfmt, OutputFormat::Json] {
        let name = format!("{:?}", format).to_lowercase();
        let logger = Logger::builder().output_format(format).build();
        let mut entry = logger.entry();
        entry
            .add_field("user_id", 12345)
            .add_field("request_id", "abc-def-ghi")
            .add_field("message with spaces", "needs quoting");

        group.bench_function(name, |b| {
            b.iter(|| black_box(entry.render()));
        });
    }

    group.finish();
}

// ============================================================================
// Callstack Benchmarks
// ============================================================================

fn bench_callstack(c: &mut Criterion) {
    let mut group = c.benchmark_group("callstack");

    let stack: Vec<Frame> = (0..32)
        .map(|i| {
            if i % 4 == 0 {
                Frame::new(format!("/usr/lib/runtime/asm_{}.s", i), i)
            } else {
                Frame::new(format!("/home/dev/app/src/module_{}.rs", i), i * 10)
            }
        })
        .collect();
    let filter = FrameFilter::default();

    group.bench_function("format_fake_stack", |b| {
        b.iter(|| black_box(format_callstack(&stack, 0, &filter)));
    });

    group.bench_function("capture", |b| {
        b.iter(|| black_box(BacktraceSource::capture()));
    });

    let logger = quiet_logger();
    group.bench_function("add_callstack", |b| {
        b.iter(|| {
            let mut entry = logger.entry();
            entry.add_callstack();
            black_box(entry)
        });
    });

    group.finish();
}

// ============================================================================
// Emission Benchmarks
// ============================================================================

fn bench_emission(c: &mut Criterion) {
    let mut group = c.benchmark_group("emission");
    group.throughput(Throughput::Elements(1));

    let memory = MemoryAppender::new();
    let records = memory.handle();
    let logger = Logger::builder().appender(memory).build();

    group.bench_function("info_with_fields", |b| {
        b.iter(|| {
            let mut entry = logger.entry();
            entry.add_field("attempt", 3);
            entry.info(black_box("retrying"));
            if records.len() > 10_000 {
                records.clear();
            }
        });
    });

    group.bench_function("filtered_debug", |b| {
        b.iter(|| logger.entry().debug(black_box("dropped by threshold")));
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_entry_building,
    bench_render,
    bench_callstack,
    bench_emission
);
criterion_main!(benches);
