use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use slice_mcmc::config::SliceConfig;
use slice_mcmc::distributions::IsotropicGaussian;
use slice_mcmc::slice_sampler::SliceMarkovChain;

fn bench_draws(c: &mut Criterion) {
    let mut group = c.benchmark_group("slice_draws");
    for dim in [1usize, 10, 100] {
        for componentwise in [true, false] {
            let label = if componentwise { "componentwise" } else { "composite" };
            group.bench_with_input(BenchmarkId::new(label, dim), &dim, |b, &dim| {
                let config = SliceConfig::default().componentwise(componentwise).seed(42);
                let initial_state = vec![0.0; dim];
                let mut chain =
                    SliceMarkovChain::new(IsotropicGaussian::new(1.0), &initial_state, config)
                        .expect("valid settings");
                b.iter(|| black_box(chain.advance().value()[0]));
            });
        }
    }
    group.finish();
}

criterion_group!(benches, bench_draws);
criterion_main!(benches);
