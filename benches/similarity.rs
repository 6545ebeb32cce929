use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use dupfinder::{cosine_similarity, DuplicateClassifier, ModelProvider, SemanticConfig};
use std::hint::black_box;

fn vector(dimension: usize, seed: f32) -> Vec<f32> {
    (0..dimension)
        .map(|i| ((i as f32 + seed) * 0.37).sin())
        .collect()
}

/// Benchmark cosine similarity at common embedding widths
fn bench_cosine(c: &mut Criterion) {
    let mut group = c.benchmark_group("cosine_similarity");

    for dimension in [3usize, 384, 768, 1024] {
        let a = vector(dimension, 1.0);
        let b = vector(dimension, 2.5);
        group.throughput(Throughput::Elements(dimension as u64));
        group.bench_with_input(BenchmarkId::from_parameter(dimension), &dimension, |bench, _| {
            bench.iter(|| cosine_similarity(black_box(&a), black_box(&b)))
        });
    }

    group.finish();
}

fn bench_classify(c: &mut Criterion) {
    let classifier = DuplicateClassifier::default();
    let a = vector(1024, 1.0);
    let b = vector(1024, 1.1);

    c.bench_function("classify_duplicate_1024", |bench| {
        bench.iter(|| classifier.classify(black_box(&a), black_box(&b)))
    });
}

/// Stub encoder batches measure the provider's grouping and normalization cost
fn bench_stub_batch(c: &mut Criterion) {
    let mut group = c.benchmark_group("stub_encode_batch");
    let provider = ModelProvider::new(SemanticConfig::stub());
    provider.get_model().expect("stub model loads");

    for size in [1usize, 32, 100] {
        let texts: Vec<String> = (0..size).map(|i| format!("benchmark text {i}")).collect();
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &texts, |bench, texts| {
            bench.iter(|| provider.encode_batch(black_box(texts)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_cosine, bench_classify, bench_stub_batch);
criterion_main!(benches);
