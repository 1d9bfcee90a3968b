use criterion::{criterion_group, criterion_main, Criterion};
use ncdist::NcdEngine;
use std::hint::black_box;

fn batch_items(n: usize) -> Vec<String> {
    (0..n)
        .map(|i| {
            format!(
                "item {} of the benchmark corpus: {}",
                i,
                "lorem ipsum dolor sit amet ".repeat(8 + i % 5)
            )
        })
        .collect()
}

fn bench_calculate(c: &mut Criterion) {
    let engine = NcdEngine::new();
    let a = "the quick brown fox jumps over the lazy dog ".repeat(20);
    let b = "pack my box with five dozen liquor jugs ".repeat(20);

    c.bench_function("calculate_pair", |bencher| {
        bencher.iter(|| engine.calculate(black_box(&a), black_box(&b), false).unwrap())
    });
}

fn bench_symmetric(c: &mut Criterion) {
    let engine = NcdEngine::new();
    let items = batch_items(16);

    c.bench_function("symmetric_16", |bencher| {
        bencher.iter(|| engine.symmetric(black_box(&items), false).unwrap())
    });
}

fn bench_unsymmetric(c: &mut Criterion) {
    let engine = NcdEngine::new();
    let items = batch_items(16);

    c.bench_function("unsymmetric_16", |bencher| {
        bencher.iter(|| engine.unsymmetric(black_box(&items), false).unwrap())
    });
}

criterion_group!(benches, bench_calculate, bench_symmetric, bench_unsymmetric);
criterion_main!(benches);
