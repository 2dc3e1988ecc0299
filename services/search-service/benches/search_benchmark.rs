//! Search Service Benchmarks
//!
//! Measures query tokenization and additive scoring across a representative
//! candidate set, the hottest path of `search` once postings are loaded.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use gutenberg::BookId;
use gutenberg::BookMetadata;
use search_core::{score, tokenize_query};
use std::collections::HashSet;

fn sample_metadata(n: u32) -> Vec<BookMetadata> {
    (0..n)
        .map(|i| BookMetadata {
            book_id: BookId::new(1000 + i).unwrap(),
            title: format!("Test Book {i}"),
            author: format!("Test Author {}", i % 50),
            language: "en".to_string(),
            year: Some(1800 + (i % 200)),
            path: "/data".to_string(),
        })
        .collect()
}

fn benchmark_tokenize_query(c: &mut Criterion) {
    let query = "pride prejudice jane austen";
    c.bench_function("tokenize_query", |b| b.iter(|| tokenize_query(black_box(query))));
}

fn benchmark_score_small_dataset(c: &mut Criterion) {
    let books = sample_metadata(1000);
    let tokens = vec!["test".to_string(), "book".to_string()];
    let postings = vec![HashSet::from([1000u32, 1001]), HashSet::from([1002u32])];

    c.bench_function("score_small_dataset", |b| {
        b.iter(|| {
            books
                .iter()
                .map(|m| score(black_box(m), black_box(&tokens), black_box(&postings)))
                .collect::<Vec<_>>()
        })
    });
}

criterion_group!(benches, benchmark_tokenize_query, benchmark_score_small_dataset);
criterion_main!(benches);
