// ============================================================================
// Arithmetic Benchmarks
// ============================================================================
//
// Benchmark Categories:
// 1. Core Operations - add/sub/mpy/div across significand widths
// 2. Square Root - Newton-Raphson convergence cost by width
// 3. Formatting & Parsing - string conversion round trips
//
// Width Notes:
// - The long-hand algorithms are O(n) for add/sub and O(n²) for mpy/div in
//   the significand width, so the wide cases dominate
// ============================================================================

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use std::hint::black_box;
use unumber::prelude::*;

/// A non-trivial operand of the given width: digits cycle 1..9 so every
/// position participates in carry propagation.
fn sample_value(width: usize, characteristic: i32) -> UNumber {
    let digits: String = (0..width)
        .map(|i| char::from(b'1' + (i % 9) as u8))
        .collect();
    UNumber::from_digits(&digits, characteristic, true)
}

// ============================================================================
// Core Operation Benchmarks
// ============================================================================

fn benchmark_addition(c: &mut Criterion) {
    let mut group = c.benchmark_group("addition");

    for width in [5, 20, 50, 200].iter() {
        let a = sample_value(*width, 3);
        let b = sample_value(*width, 1);

        group.bench_with_input(BenchmarkId::from_parameter(width), &(a, b), |bench, (a, b)| {
            bench.iter(|| {
                let mut sum = a.clone();
                sum.add(b);
                black_box(sum)
            });
        });
    }

    group.finish();
}

fn benchmark_subtraction_with_complement(c: &mut Criterion) {
    let mut group = c.benchmark_group("subtraction_complement");

    // Subtracting the larger magnitude forces the ten's-complement
    // correction path on every iteration.
    for width in [5, 20, 50, 200].iter() {
        let small = sample_value(*width, 1);
        let large = sample_value(*width, 5);

        group.bench_with_input(
            BenchmarkId::from_parameter(width),
            &(small, large),
            |bench, (small, large)| {
                bench.iter(|| {
                    let mut diff = small.clone();
                    diff.sub(large);
                    black_box(diff)
                });
            },
        );
    }

    group.finish();
}

fn benchmark_multiplication(c: &mut Criterion) {
    let mut group = c.benchmark_group("multiplication");

    for width in [5, 20, 50, 200].iter() {
        let a = sample_value(*width, 2);
        let b = sample_value(*width, 0);

        group.bench_with_input(BenchmarkId::from_parameter(width), &(a, b), |bench, (a, b)| {
            bench.iter(|| {
                let mut product = a.clone();
                product.mpy(b);
                black_box(product)
            });
        });
    }

    group.finish();
}

fn benchmark_division(c: &mut Criterion) {
    let mut group = c.benchmark_group("division");

    for width in [5, 20, 50, 200].iter() {
        // 1/7 never terminates, so every quotient digit costs full work.
        let dividend = UNumber::from(1i64).resized(*width);
        let divisor = UNumber::from(7i64);

        group.bench_with_input(
            BenchmarkId::from_parameter(width),
            &(dividend, divisor),
            |bench, (dividend, divisor)| {
                bench.iter(|| {
                    let mut quotient = dividend.clone();
                    quotient.div(divisor);
                    black_box(quotient)
                });
            },
        );
    }

    group.finish();
}

// ============================================================================
// Square Root Benchmarks
// ============================================================================

fn benchmark_square_root(c: &mut Criterion) {
    let mut group = c.benchmark_group("square_root");

    for width in [5, 20, 50, 200].iter() {
        let two = UNumber::from(2i64).resized(*width);

        group.bench_with_input(BenchmarkId::from_parameter(width), &two, |bench, two| {
            bench.iter(|| black_box(sqrt(two)));
        });
    }

    group.finish();
}

// ============================================================================
// Formatting & Parsing Benchmarks
// ============================================================================

fn benchmark_formatting(c: &mut Criterion) {
    let mut group = c.benchmark_group("formatting");

    let value = sample_value(50, 3);

    group.bench_function("display_unbounded", |bench| {
        bench.iter(|| black_box(value.to_string()));
    });
    group.bench_function("scientific_budgeted", |bench| {
        bench.iter(|| black_box(value.to_scientific_string(12)));
    });
    group.bench_function("decimal_notation", |bench| {
        bench.iter(|| black_box(value.to_decimal_string()));
    });

    group.finish();
}

fn benchmark_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("parsing");

    for input in ["123", "-12.5E-3", "+0.00054321e12"].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(input), input, |bench, input| {
            bench.iter(|| black_box(parse_measured_value(input, 20)));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_addition,
    benchmark_subtraction_with_complement,
    benchmark_multiplication,
    benchmark_division,
    benchmark_square_root,
    benchmark_formatting,
    benchmark_parsing,
);
criterion_main!(benches);
