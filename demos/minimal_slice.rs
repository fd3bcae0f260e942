use slice_mcmc::config::SliceConfig;
use slice_mcmc::core::ChainRunner;
use slice_mcmc::distributions::IsotropicGaussian;
use slice_mcmc::slice_sampler::SliceSampler;

fn main() {
    let target = IsotropicGaussian::new(1.0);
    let initial_state = [0.0, 0.0];

    // 4 parallel chains with the default settings
    let mut sampler = SliceSampler::new(target, &initial_state, 4, SliceConfig::default())
        .expect("default settings are valid");

    // Collect 1,000 draws per chain after discarding 100
    let samples = sampler.run(1000, 100).expect("sampling succeeds");

    // [chains, draws, dimensions]
    assert_eq!(samples.shape(), &[4, 1000, 2]);
}
