//! Criterion microbenches for yolocheck label parsing and classification.
//!
//! Run with: `cargo bench`
//!
//! These benchmarks measure the performance of:
//! - YOLO label line parsing (parse_label_line)
//! - Quality threshold classification (evaluate_measure)

use criterion::{criterion_group, criterion_main, Criterion, Throughput};
use std::hint::black_box;

use yolocheck::label::parse_label_line;
use yolocheck::quality::{evaluate_measure, ImageMeasure, QualityOptions};

// A realistic label file worth of lines (no file I/O during benchmark)
const LABEL_FIXTURE: &str = "0 0.481250 0.533333 0.062500 0.088889
1 0.250000 0.250000 0.100000 0.200000
2 0.910937 0.120370 0.045313 0.074074
0 0.500000 0.500000 1.000000 1.000000
3 0.132812 0.862037 0.029688 0.051852
";

/// Benchmark label line parsing across a small fixture.
fn bench_label_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("label_parse");
    group.throughput(Throughput::Bytes(LABEL_FIXTURE.len() as u64));

    group.bench_function("parse_label_line", |b| {
        b.iter(|| {
            for line in black_box(LABEL_FIXTURE).lines() {
                let row = parse_label_line(black_box(line)).unwrap();
                black_box(row);
            }
        })
    });

    group.finish();
}

/// Benchmark quality classification over a grid of measurements.
fn bench_quality_evaluate(c: &mut Criterion) {
    let opts = QualityOptions::default();
    let measures: Vec<ImageMeasure> = (1..100u32)
        .map(|i| ImageMeasure {
            width: i * 13,
            height: i * 7,
            aspect: 13.0 / 7.0,
            variance: (i as f64) * 0.5,
        })
        .collect();

    let mut group = c.benchmark_group("quality_evaluate");
    group.throughput(Throughput::Elements(measures.len() as u64));

    group.bench_function("evaluate_measure", |b| {
        b.iter(|| {
            for measure in &measures {
                let kinds = evaluate_measure(black_box(measure), black_box(&opts));
                black_box(kinds);
            }
        })
    });

    group.finish();
}

criterion_group!(benches, bench_label_parse, bench_quality_evaluate);
criterion_main!(benches);
