//! Tests verifying that slice sampling recovers the mean and covariance of 2D Gaussians,
//! with both direction strategies and with several chains run in parallel.

use approx::assert_abs_diff_eq;
use ndarray::{arr1, arr2, Array2, Axis};
use ndarray_stats::CorrelationExt;
use slice_mcmc::config::SliceConfig;
use slice_mcmc::core::ChainRunner;
use slice_mcmc::distributions::Gaussian2D;
use slice_mcmc::slice_sampler::SliceSampler;

#[cfg(test)]
mod tests {
    use super::*;

    /// Runs `n_chains` chains on a correlated 2D Gaussian and checks the pooled moments.
    fn run_gaussian_2d_test(sample_size: usize, n_chains: usize, componentwise: bool, progress: bool) {
        const BURNIN: usize = 500;
        const SEED: u64 = 42;

        let target = Gaussian2D {
            mean: arr1(&[0.0, 1.0]),
            cov: arr2(&[[4.0, 2.0], [2.0, 3.0]]),
        };

        // start far away from the mode; burn-in has to bring the chains back
        let initial_state = [10.0, 12.0];
        let config = SliceConfig::default()
            .componentwise(componentwise)
            .burnin(BURNIN)
            .init_step(1.0)
            .seed(SEED);
        let mut sampler =
            SliceSampler::new(target.clone(), &initial_state, n_chains, config).unwrap();

        let n_collect = sample_size / n_chains;
        let samples = if progress {
            sampler.run_progress(n_collect, 0).unwrap()
        } else {
            sampler.run(n_collect, 0).unwrap()
        };
        assert_eq!(samples.shape(), &[n_chains, n_collect, 2]);

        let stacked: Array2<f64> = samples
            .into_shape_with_order((sample_size, 2))
            .expect("Failed to reshape samples");

        let mean = stacked.mean_axis(Axis(0)).unwrap();
        let cov = stacked.t().cov(1.0).unwrap();
        assert_abs_diff_eq!(mean, target.mean, epsilon = 0.3);
        assert_abs_diff_eq!(cov, target.cov, epsilon = 0.5);
    }

    #[test]
    fn test_componentwise_single_chain() {
        run_gaussian_2d_test(10_000, 1, true, false);
    }

    #[test]
    fn test_composite_single_chain() {
        run_gaussian_2d_test(10_000, 1, false, false);
    }

    #[test]
    fn test_componentwise_4_chains() {
        run_gaussian_2d_test(40_000, 4, true, false);
    }

    #[test]
    fn test_composite_4_chains() {
        run_gaussian_2d_test(40_000, 4, false, false);
    }

    #[test]
    fn test_progress_4_chains() {
        run_gaussian_2d_test(40_000, 4, true, true);
    }

    #[test]
    #[ignore = "Slow test: run only when explicitly requested"]
    fn test_composite_16_chains_long() {
        run_gaussian_2d_test(1_600_000, 16, false, false);
    }
}
