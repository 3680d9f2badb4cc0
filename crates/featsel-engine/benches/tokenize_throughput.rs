//! Tokenization Throughput Benchmark
//!
//! Measures stemmed n-gram generation over synthetic device-name corpora.
//!
//! This benchmark tests:
//! - Tokenizer.tokenize() on short and long names
//! - Tokenizer.tokenize_all() at various corpus sizes
//! - Vocabulary construction over a tokenized corpus

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use featsel_engine::{Tokenizer, Vocabulary};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Words device names are assembled from
const WORDS: &[&str] = &[
    "infusion", "pump", "catheter", "guiding", "blood", "pressure", "monitor", "cuff",
    "surgical", "stapler", "implantable", "cardiac", "pacemaker", "orthopedic", "screw",
    "plate", "spinal", "fixation", "system", "diagnostic", "x-ray", "ultrasound",
    "transducer", "electrode", "powered", "wheelchair", "dental", "implant", "abutment",
    "endoscope", "accessories", "(disposable)", "sterile", "kit",
];

/// Generates a device name of 2 to 7 words
fn generate_name(rng: &mut impl Rng) -> String {
    let len = rng.gen_range(2..=7);
    (0..len)
        .map(|_| WORDS[rng.gen_range(0..WORDS.len())])
        .collect::<Vec<_>>()
        .join(" ")
}

fn generate_corpus(size: usize) -> Vec<String> {
    let mut rng = StdRng::seed_from_u64(42);
    (0..size).map(|_| generate_name(&mut rng)).collect()
}

/// Benchmarks single-name tokenization
fn single_name_benchmark(c: &mut Criterion) {
    let tokenizer = Tokenizer::default();
    let mut group = c.benchmark_group("tokenize_single");

    group.bench_function("short_name", |b| {
        b.iter(|| black_box(tokenizer.tokenize(black_box("Infusion Pump"))))
    });

    group.bench_function("long_name", |b| {
        b.iter(|| {
            black_box(tokenizer.tokenize(black_box(
                "Implantable Cardiac Pacemaker Electrode, Sterile Kit (Disposable)",
            )))
        })
    });

    group.finish();
}

/// Benchmarks parallel corpus tokenization at various sizes
fn corpus_benchmark(c: &mut Criterion) {
    let tokenizer = Tokenizer::default();
    let mut group = c.benchmark_group("tokenize_corpus");

    for size in [1_000, 10_000, 50_000] {
        let corpus = generate_corpus(size);

        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("records", size), &corpus, |b, corpus| {
            b.iter(|| black_box(tokenizer.tokenize_all(corpus)))
        });
    }

    group.finish();
}

/// Benchmarks vocabulary construction
fn vocabulary_benchmark(c: &mut Criterion) {
    let tokenizer = Tokenizer::default();
    let mut group = c.benchmark_group("vocabulary");

    for size in [1_000, 10_000, 50_000] {
        let documents = tokenizer.tokenize_all(&generate_corpus(size));

        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("records", size), &documents, |b, documents| {
            b.iter(|| black_box(Vocabulary::from_documents(documents)))
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    single_name_benchmark,
    corpus_benchmark,
    vocabulary_benchmark
);
criterion_main!(benches);
