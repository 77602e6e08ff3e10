//! Criterion benchmarks for the trial runner.

use std::num::NonZeroUsize;

use amplimer::BasisLabel;
use bellverse::{run_partitioned, trial, Experiment, TrialCount};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;

const SEED: u64 = 42;

fn experiment_benchmark(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("experiments");
    let trials = TrialCount::new(10_000).unwrap();

    for experiment in Experiment::ALL {
        let circuit = experiment.circuit();
        group.bench_function(BenchmarkId::new("run", experiment), |bencher| {
            bencher.iter_with_setup(
                || StdRng::seed_from_u64(SEED),
                |mut rng| trial::run(BasisLabel::Zero, &circuit, trials, &mut rng),
            );
        });
    }
    group.finish();
}

fn partition_benchmark(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("partitions");
    group.sample_size(20);

    let circuit = Experiment::BellTest.circuit();
    let trials = TrialCount::new(200_000).unwrap();

    for partitions in [1, 4, 16] {
        let count = NonZeroUsize::new(partitions).unwrap();
        group.bench_with_input(BenchmarkId::new("BellTest", partitions), &count, |bencher, &count| {
            bencher.iter(|| run_partitioned(BasisLabel::Zero, &circuit, trials, SEED, count));
        });
    }
    group.finish();
}

criterion_group!(benches, experiment_benchmark, partition_benchmark);
criterion_main!(benches);
