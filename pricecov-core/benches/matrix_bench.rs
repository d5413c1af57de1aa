//! Criterion benchmarks for the availability engine hot paths.
//!
//! Benchmarks:
//! 1. Matrix build (dedupe + mark + validate) at exchange scale
//! 2. Instrument summary over every ticker column
//! 3. Date summary over every calendar row
//! 4. Matrix CSV write + read

use chrono::{Days, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use pricecov_core::matrix::{read_matrix_csv, write_matrix_csv};
use pricecov_core::{
    Calendar, DateSummarizer, InstrumentSummarizer, MatrixBuilder, RawObservation, RuleClassifier,
};

// ── Helpers ──────────────────────────────────────────────────────────

fn start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2012, 10, 1).unwrap()
}

/// Deterministic synthetic source: each ticker trades on most weekdays.
fn make_source(tickers: usize, days: u64, skip_every: u64) -> Vec<RawObservation> {
    let mut rows = Vec::new();
    for t in 0..tickers {
        let ticker = format!("T{t:04}");
        for day in 0..days {
            if (day + t as u64) % skip_every == 0 {
                continue;
            }
            let date = start() + Days::new(day);
            rows.push(RawObservation::new(ticker.clone(), date, Some(100.0 + day as f64)));
        }
    }
    rows
}

fn calendar(days: u64) -> Calendar {
    Calendar::new(start(), start() + Days::new(days - 1)).unwrap()
}

// ── Benchmarks ───────────────────────────────────────────────────────

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("matrix_build");
    for &(tickers, days) in &[(50usize, 365u64), (400, 1825)] {
        let adjusted = make_source(tickers, days, 7);
        let unadjusted = make_source(tickers, days, 5);
        let builder = MatrixBuilder::new(calendar(days));
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{tickers}x{days}")),
            &(adjusted, unadjusted),
            |b, (adj, unadj)| b.iter(|| builder.build(black_box(unadj), black_box(adj)).unwrap()),
        );
    }
    group.finish();
}

fn bench_summaries(c: &mut Criterion) {
    let days = 1825;
    let matrix = MatrixBuilder::new(calendar(days))
        .build(&make_source(400, days, 5), &make_source(400, days, 7))
        .unwrap();
    let classifier = RuleClassifier::default();

    c.bench_function("instrument_summary_400x1825", |b| {
        b.iter(|| InstrumentSummarizer::new(&classifier).summarize(black_box(&matrix)))
    });
    c.bench_function("date_summary_400x1825", |b| {
        b.iter(|| DateSummarizer::default().summarize(black_box(&matrix)))
    });
}

fn bench_persist(c: &mut Criterion) {
    let days = 1825;
    let matrix = MatrixBuilder::new(calendar(days))
        .build(&make_source(400, days, 5), &make_source(400, days, 7))
        .unwrap();

    c.bench_function("matrix_csv_round_trip_400x1825", |b| {
        b.iter(|| {
            let mut buf = Vec::new();
            write_matrix_csv(black_box(&matrix), &mut buf).unwrap();
            read_matrix_csv(buf.as_slice()).unwrap()
        })
    });
}

criterion_group!(benches, bench_build, bench_summaries, bench_persist);
criterion_main!(benches);
