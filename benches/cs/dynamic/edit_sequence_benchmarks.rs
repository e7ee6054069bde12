use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use edit_script::{
    BoundedWindowEngine, DiffEngine, EditCosts, ForwardPass, SequentialEngine, WavefrontConfig,
    WavefrontEngine,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz ";

fn random_text(rng: &mut StdRng, len: usize) -> Vec<u8> {
    (0..len)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())])
        .collect()
}

/// A copy of `text` with roughly one symbol in ten replaced.
fn mutate(rng: &mut StdRng, text: &[u8]) -> Vec<u8> {
    text.iter()
        .map(|&c| {
            if rng.gen_bool(0.1) {
                ALPHABET[rng.gen_range(0..ALPHABET.len())]
            } else {
                c
            }
        })
        .collect()
}

fn inputs(len: usize) -> (Vec<u8>, Vec<u8>) {
    let mut rng = StdRng::seed_from_u64(42);
    let source = random_text(&mut rng, len);
    let target = mutate(&mut rng, &source);
    (source, target)
}

fn bench_engines(c: &mut Criterion) {
    let mut group = c.benchmark_group("edit_sequence");
    group.sample_size(10);

    for &len in &[256usize, 1_024, 4_096] {
        let (source, target) = inputs(len);

        group.bench_with_input(BenchmarkId::new("sequential", len), &len, |b, _| {
            let engine = SequentialEngine::new();
            b.iter(|| {
                engine
                    .compute(Some(black_box(&source)), Some(&target), EditCosts::default())
                    .unwrap()
            })
        });

        for workers in [2usize, 4, 8] {
            let engine =
                WavefrontEngine::new(WavefrontConfig::default().with_workers(workers)).unwrap();
            group.bench_with_input(
                BenchmarkId::new(format!("wavefront/{workers}"), len),
                &len,
                |b, _| {
                    b.iter(|| {
                        engine
                            .compute(Some(black_box(&source)), Some(&target), EditCosts::default())
                            .unwrap()
                    })
                },
            );
        }
    }
    group.finish();
}

fn bench_window_rows(c: &mut Criterion) {
    let mut group = c.benchmark_group("edit_sequence_window_rows");
    group.sample_size(10);

    let (source, target) = inputs(1_024);
    let wavefront = WavefrontEngine::new(WavefrontConfig::default()).unwrap();
    for &rows in &[16usize, 64, 256, 1_024] {
        let sequential = BoundedWindowEngine::new(rows).unwrap();
        let parallel = BoundedWindowEngine::new(rows)
            .unwrap()
            .with_forward_pass(ForwardPass::Wavefront(wavefront.clone()));

        for (name, engine) in [("sequential", sequential), ("wavefront", parallel)] {
            group.bench_with_input(BenchmarkId::new(name, rows), &rows, |b, _| {
                b.iter(|| {
                    engine
                        .compute(Some(black_box(&source)), Some(&target), EditCosts::default())
                        .unwrap()
                })
            });
        }
    }
    group.finish();
}

criterion_group!(benches, bench_engines, bench_window_rows);
criterion_main!(benches);
