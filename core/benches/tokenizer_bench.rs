use criterion::{criterion_group, criterion_main, Criterion};
use search_core::tokenizer::tokenize;
use search_core::SearchEngine;

const TEXT: &str = "The quick brown fox jumps over the lazy dog. \
    A dog and a cat play together in the garden. \
    The fox is having a lazy day, but the cat is awake.";

fn bench_tokenize(c: &mut Criterion) {
    c.bench_function("tokenize_paragraph", |b| b.iter(|| tokenize(TEXT)));
}

fn bench_search(c: &mut Criterion) {
    let mut engine = SearchEngine::new();
    for i in 0..1_000u64 {
        let extra = if i % 3 == 0 { "cat" } else { "bird" };
        engine.add_document(format!("{TEXT} {extra}"), Some(i));
    }
    c.bench_function("search_and", |b| b.iter(|| engine.search("fox AND cat")));
    c.bench_function("search_or", |b| b.iter(|| engine.search("cat OR bird")));
}

criterion_group!(benches, bench_tokenize, bench_search);
criterion_main!(benches);
