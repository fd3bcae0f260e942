//! Running per-chain moments and the Gelman–Rubin potential scale reduction factor.
//!
//! These back the progress output of [`ChainRunner::run_progress`](crate::core::ChainRunner).
//! They are deliberately minimal: no effective sample size, no split chains.

use ndarray::prelude::*;
use ndarray_stats::QuantileExt;
use num_traits::ToPrimitive;

use crate::error::Result;

/// Accumulates the mean and mean of squares of every parameter of one chain.
#[derive(Debug, Clone, PartialEq)]
pub struct ChainTracker {
    n_params: usize,
    n: u64,
    mean: Array1<f64>,    // n_params
    mean_sq: Array1<f64>, // n_params
}

/// A snapshot of a [`ChainTracker`].
#[derive(Debug, Clone, PartialEq)]
pub struct ChainStats {
    pub n: u64,
    pub mean: Array1<f64>, // n_params
    pub sm2: Array1<f64>,  // n_params
}

impl ChainTracker {
    pub fn new(n_params: usize) -> Self {
        Self {
            n_params,
            n: 0,
            mean: Array1::zeros(n_params),
            mean_sq: Array1::zeros(n_params),
        }
    }

    /// Folds one draw into the running moments. Fails if `x` has the wrong length.
    pub fn step<T: ToPrimitive>(&mut self, x: &[T]) -> Result<()> {
        let x_arr = ArrayView1::from_shape(self.n_params, x)?
            .map(|v| v.to_f64().unwrap_or(f64::NAN));
        self.n += 1;
        let n = self.n as f64;
        self.mean = (&self.mean * (n - 1.0) + &x_arr) / n;
        self.mean_sq = (&self.mean_sq * (n - 1.0) + x_arr.mapv(|v| v * v)) / n;
        Ok(())
    }

    pub fn n(&self) -> u64 {
        self.n
    }

    pub fn mean(&self) -> &Array1<f64> {
        &self.mean
    }

    /// Unbiased sample variance of every parameter.
    pub fn sm2(&self) -> Array1<f64> {
        let n = self.n as f64;
        (&self.mean_sq - &self.mean.mapv(|m| m * m)) * n / (n - 1.0)
    }

    pub fn stats(&self) -> ChainStats {
        ChainStats {
            n: self.n,
            mean: self.mean.clone(),
            sm2: self.sm2(),
        }
    }
}

/// R-hat of every parameter across chains. Needs at least two chains; otherwise the
/// between-chain variance is undefined and the result is NaN.
pub fn collect_rhat(all_chain_stats: &[&ChainStats]) -> Array1<f64> {
    let n_params = all_chain_stats.first().map_or(0, |s| s.mean.len());
    let m = all_chain_stats.len();
    if m < 2 {
        return Array1::from_elem(n_params, f64::NAN);
    }
    let mut means = Array2::<f64>::zeros((m, n_params));
    let mut sm2s = Array2::<f64>::zeros((m, n_params));
    for (i, s) in all_chain_stats.iter().enumerate() {
        means.row_mut(i).assign(&s.mean);
        sm2s.row_mut(i).assign(&s.sm2);
    }

    let w = sm2s.sum_axis(Axis(0)) / m as f64;
    let global_means = means.sum_axis(Axis(0)) / m as f64;
    let diffs = &means - &global_means;
    let b = diffs.mapv(|d| d * d).sum_axis(Axis(0)) / (m - 1) as f64;

    let n = all_chain_stats.iter().map(|s| s.n as f64).sum::<f64>() / m as f64;
    ((b + &w * ((n - 1.0) / n)) / w).mapv(f64::sqrt)
}

/// The largest R-hat, ignoring parameters for which it is undefined.
pub fn max_rhat(all_chain_stats: &[&ChainStats]) -> f64 {
    let rhat = collect_rhat(all_chain_stats);
    if rhat.is_empty() {
        return f64::NAN;
    }
    *rhat.max_skipnan()
}
