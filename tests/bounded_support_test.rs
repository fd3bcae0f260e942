//! Slice sampling of a flat density with hard boundaries.
//!
//! On a flat target every slice is the whole support, so each draw is an independent
//! uniform draw. That makes a two-sample Kolmogorov–Smirnov test against direct uniform
//! draws a valid check.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use slice_mcmc::config::SliceConfig;
use slice_mcmc::distributions::UniformBox;
use slice_mcmc::slice_sampler::SliceMarkovChain;

#[cfg(test)]
mod tests {
    use super::*;

    const N: usize = 5_000;

    fn draws(componentwise: bool, step_base: f64, seed: u64) -> Vec<f64> {
        let target = UniformBox::new(vec![-1.0], vec![1.0]);
        let config = SliceConfig::default()
            .componentwise(componentwise)
            .step_base(step_base)
            .seed(seed);
        SliceMarkovChain::new(target, &[0.0], config)
            .unwrap()
            .take(N)
            .map(|s| s.value()[0])
            .collect()
    }

    #[test]
    fn test_samples_stay_in_support() {
        for (componentwise, step_base) in [(true, 2.0), (false, 2.0), (true, 1.0), (false, 1.5)] {
            let xs = draws(componentwise, step_base, 7);
            let outside = xs.iter().filter(|x| x.abs() > 1.0).count();
            assert_eq!(outside, 0, "componentwise={componentwise}, step_base={step_base}");
        }
    }

    #[test]
    fn test_samples_are_uniform() {
        let mut rng = SmallRng::seed_from_u64(1234);
        let reference: Vec<f64> = (0..N).map(|_| rng.gen_range(-1.0..=1.0)).collect();
        for componentwise in [true, false] {
            let xs = draws(componentwise, 2.0, 99);
            let result = kolmogorov_smirnov::test_f64(&xs, &reference, 0.999);
            assert!(
                !result.is_rejected,
                "KS test rejected uniformity (componentwise={componentwise}, statistic={})",
                result.statistic
            );
        }
    }

    #[test]
    fn test_box_in_two_dimensions() {
        let target = UniformBox::new(vec![0.0, -2.0], vec![1.0, 2.0]);
        let config = SliceConfig::default().init_step(0.05).seed(3);
        let chain = SliceMarkovChain::new(target, &[0.5, 0.0], config).unwrap();
        let mut mean = [0.0; 2];
        for sample in chain.take(N) {
            let v = sample.value();
            assert!((0.0..=1.0).contains(&v[0]) && (-2.0..=2.0).contains(&v[1]));
            mean[0] += v[0] / N as f64;
            mean[1] += v[1] / N as f64;
        }
        assert!((mean[0] - 0.5).abs() < 0.05, "mean {:?}", mean);
        assert!(mean[1].abs() < 0.1, "mean {:?}", mean);
    }
}
