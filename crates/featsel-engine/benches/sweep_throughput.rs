//! Sweep Throughput Benchmark
//!
//! Measures distance scoring and the filter-strength sweep over synthetic
//! labeled corpora.
//!
//! This benchmark tests:
//! - DistanceEngine.score() at various column batch sizes
//! - SweepOptimizer.sweep() over the default grid at various corpus sizes
//! - The full pipeline over both framings

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use featsel_core::{ComplexityClass, Corpus, PipelineConfig, Record};
use featsel_engine::{
    CategoricalFraming, DistanceEngine, FeatureSelectionPipeline, FeatureSet, Grid,
    SweepOptimizer, Tokenizer, Vocabulary,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const WORDS: &[&str] = &[
    "infusion", "pump", "catheter", "guiding", "blood", "pressure", "monitor", "cuff",
    "surgical", "stapler", "implantable", "cardiac", "pacemaker", "orthopedic", "screw",
    "plate", "spinal", "fixation", "system", "diagnostic", "ultrasound", "transducer",
    "electrode", "powered", "wheelchair", "dental", "implant", "abutment", "endoscope",
];

/// Generates a labeled corpus; the class loosely follows the first word
fn generate_corpus(size: usize) -> Corpus {
    let mut rng = StdRng::seed_from_u64(7);
    let records = (0..size)
        .map(|i| {
            let len = rng.gen_range(2..=6);
            let words: Vec<&str> = (0..len).map(|_| WORDS[rng.gen_range(0..WORDS.len())]).collect();
            let class = match (words[0].len() + rng.gen_range(0..3)) % 3 {
                0 => ComplexityClass::Low,
                1 => ComplexityClass::Medium,
                _ => ComplexityClass::High,
            };
            let outcome = rng.gen_range(0.5..3.5);
            Record::new(format!("K{i:06}"), words.join(" "), class, outcome)
        })
        .collect();
    Corpus::new(records).unwrap()
}

fn tokenize(corpus: &Corpus) -> Vec<FeatureSet> {
    let names: Vec<&str> = corpus.device_names().collect();
    Tokenizer::default().tokenize_all(&names)
}

/// Benchmarks scoring of the top 1000 tokens at various batch sizes
fn batch_size_benchmark(c: &mut Criterion) {
    let corpus = generate_corpus(10_000);
    let documents = tokenize(&corpus);
    let vocabulary = Vocabulary::from_documents(&documents);
    let framing = CategoricalFraming::new(&corpus).unwrap();
    let candidates = vocabulary.top_k(1000);

    let mut group = c.benchmark_group("score_batch_size");
    group.throughput(Throughput::Elements(candidates.len() as u64));

    for batch_size in [64, 512, 2048] {
        let engine = DistanceEngine::new(&documents, &framing).with_batch_size(batch_size);
        group.bench_with_input(BenchmarkId::new("batch", batch_size), &batch_size, |b, _| {
            b.iter(|| black_box(engine.score(candidates)))
        });
    }

    group.finish();
}

/// Benchmarks the default 10..=1000 grid sweep at various corpus sizes
fn sweep_benchmark(c: &mut Criterion) {
    let grid = Grid::linspace(10, 1000, 100).unwrap();
    let mut group = c.benchmark_group("sweep");
    group.sample_size(20);

    for size in [1_000, 10_000] {
        let corpus = generate_corpus(size);
        let documents = tokenize(&corpus);
        let vocabulary = Vocabulary::from_documents(&documents);
        let framing = CategoricalFraming::new(&corpus).unwrap();

        group.bench_with_input(BenchmarkId::new("records", size), &size, |b, _| {
            b.iter(|| {
                let engine = DistanceEngine::new(&documents, &framing);
                let optimizer =
                    SweepOptimizer::new(&vocabulary, engine, corpus.fingerprint().clone());
                black_box(optimizer.sweep(&grid).unwrap())
            })
        });
    }

    group.finish();
}

/// Benchmarks a full run over both framings
fn pipeline_benchmark(c: &mut Criterion) {
    let corpus = generate_corpus(5_000);
    let pipeline = FeatureSelectionPipeline::new(PipelineConfig {
        min_support_pct: 0.0,
        ..PipelineConfig::default()
    });

    let mut group = c.benchmark_group("pipeline");
    group.sample_size(10);
    group.bench_function("both_framings_5k", |b| {
        b.iter(|| black_box(pipeline.run(&corpus).unwrap()))
    });
    group.finish();
}

criterion_group!(
    benches,
    batch_size_benchmark,
    sweep_benchmark,
    pipeline_benchmark
);
criterion_main!(benches);
