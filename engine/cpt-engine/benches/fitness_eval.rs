use std::hint::black_box;

use cpt_engine::{evaluate, phenotype, Genome, Modes};
use cpt_modes::{GregorianMode, ModeName};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn modes() -> Modes {
    Modes { cf: GregorianMode::plagal(ModeName::Dorian), cp: GregorianMode::authentic(ModeName::Dorian) }
}

fn fixed_tune(tune_length: usize) -> cpt_score::Tune {
    let mut rng = StdRng::seed_from_u64(42);
    let mut genome = Genome::new(tune_length, false).unwrap();
    genome.randomize(&mut rng);
    phenotype(&genome, &modes(), None, None).unwrap()
}

fn bench_evaluate(c: &mut Criterion) {
    let mut group = c.benchmark_group("fitness_evaluate");
    for &tune_length in &[4_usize, 14, 32, 64] {
        let tune = fixed_tune(tune_length);
        group.throughput(Throughput::Elements(tune_length as u64));
        group.bench_with_input(BenchmarkId::from_parameter(tune_length), &tune, |b, tune| {
            let mut battery = cpt_rules::default_battery();
            b.iter(|| {
                black_box(evaluate(tune, &mut battery, true).unwrap());
            });
        });
    }
    group.finish();
}

criterion_group!(fitness_benches, bench_evaluate);
criterion_main!(fitness_benches);
