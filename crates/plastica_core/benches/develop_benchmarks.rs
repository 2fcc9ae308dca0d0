use criterion::{black_box, criterion_group, criterion_main, Criterion};
use plastica_core::config::AppConfig;
use plastica_core::genome::crossover::genome_crossover_with_rng;
use plastica_core::{develop, ConnectionLogic, CueLogic, GenomeLogic, Model, Population};
use plastica_data::{Cue, Genome};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn model() -> Model {
    let mut config = AppConfig::default();
    config.model.ngenes = 100;
    config.model.nenv = 40;
    config.evolution.population_size = 32;
    config.density = plastica_core::config::DensityConfig::uniform(0.05);
    Model::new(config).unwrap()
}

/// Benchmark a full developmental iteration.
fn bench_develop(c: &mut Criterion) {
    let m = model();
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let genome = Genome::new_random_with_rng(&m.layout, &mut rng);
    let cue = Cue::random(m.nenv(), &mut rng);
    let initial = vec![1.0; m.ngenes()];

    c.bench_function("develop", |b| {
        b.iter(|| {
            let cell = develop(&genome, black_box(&initial), cue.as_slice(), &m.config.development);
            black_box(cell)
        })
    });
}

/// Benchmark the sparse matrix-vector products.
fn bench_sparse_products(c: &mut Criterion) {
    let m = model();
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let genome = Genome::new_random_with_rng(&m.layout, &mut rng);
    let v = vec![0.5; m.ngenes()];
    let mut out = vec![0.0; m.ngenes()];
    let mut out_p = vec![0.0; m.nenv()];

    c.bench_function("sparse_multiply", |b| {
        b.iter(|| {
            genome.regulatory.multiply(&mut out, black_box(&v));
            black_box(&out);
        })
    });
    c.bench_function("sparse_multiply_transpose", |b| {
        b.iter(|| {
            genome.phenotype.multiply_transpose(&mut out_p, black_box(&v));
            black_box(&out_p);
        })
    });
}

/// Benchmark genome mutation.
fn bench_genome_mutate(c: &mut Criterion) {
    let m = model();
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let mut genome = Genome::new_random_with_rng(&m.layout, &mut rng);

    c.bench_function("genome_mutate", |b| {
        b.iter(|| {
            let event = genome.mutate(&m.layout, &mut rng);
            black_box(event)
        })
    });
}

/// Benchmark genome crossover.
fn bench_genome_crossover(c: &mut Criterion) {
    let m = model();
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let mut a = Genome::new_random_with_rng(&m.layout, &mut rng);
    let mut b_genome = Genome::new_random_with_rng(&m.layout, &mut rng);
    let mut seed_a = vec![0.0; m.ngenes()];
    let mut seed_b = vec![0.0; m.ngenes()];

    c.bench_function("genome_crossover", |b| {
        b.iter(|| {
            let swapped =
                genome_crossover_with_rng(&mut a, &mut b_genome, &mut seed_a, &mut seed_b, &mut rng);
            black_box(swapped)
        })
    });
}

/// Benchmark one parallel development barrier over a population.
fn bench_develop_all(c: &mut Criterion) {
    let m = model();
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let population = Population::new_random(&m, &mut rng);

    c.bench_function("develop_all", |b| {
        b.iter(|| {
            let (developed, report) = population.clone().develop_all(1, &m, &mut rng);
            black_box((developed, report))
        })
    });
}

criterion_group!(
    benches,
    bench_develop,
    bench_sparse_products,
    bench_genome_mutate,
    bench_genome_crossover,
    bench_develop_all
);
criterion_main!(benches);
