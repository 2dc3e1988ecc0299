//! Indexing Service Benchmarks
//!
//! Measures the cost of the body tokenizer across representative text
//! sizes, the hottest path of `indexBook` once the header/body pair is
//! already on disk.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use indexing_core::tokenize;

fn sample_body(paragraphs: usize) -> String {
    "The white rabbit ran down the hole chasing Alice through Wonderland. "
        .repeat(paragraphs)
}

fn benchmark_tokenize_small_body(c: &mut Criterion) {
    let body = sample_body(20);
    c.bench_function("tokenize_small_body", |b| b.iter(|| tokenize(black_box(&body))));
}

fn benchmark_tokenize_large_body(c: &mut Criterion) {
    let body = sample_body(5000);
    c.bench_function("tokenize_large_body", |b| b.iter(|| tokenize(black_box(&body))));
}

criterion_group!(benches, benchmark_tokenize_small_body, benchmark_tokenize_large_body);
criterion_main!(benches);
