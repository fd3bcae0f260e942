/*!
Target distributions for the slice sampler.

A target only has to report an unnormalized log-density through [`TargetDistribution`].
Plain closures `Fn(&[T]) -> T` are targets too, which covers most ad-hoc models. Points
outside the support must map to negative infinity rather than panic: the sampler evaluates
points far away from the current state while it brackets a slice.

This module is generic over the floating-point precision (e.g., `f32` or `f64`) using
the [`num_traits::Float`] trait.

# Examples

```rust
use slice_mcmc::distributions::{Gaussian2D, IsotropicGaussian, Normalized, TargetDistribution, UniformBox};
use ndarray::{arr1, arr2};

let gauss = Gaussian2D {
    mean: arr1(&[0.0, 0.0]),
    cov: arr2(&[[1.0, 0.0], [0.0, 1.0]]),
};
let logp = gauss.log_prob(&[0.5, -0.5]);
println!("Normalized log-probability: {}", logp);

let iso = IsotropicGaussian::new(2.0);
assert_eq!(iso.unnorm_log_prob(&[0.0, 0.0, 0.0]), 0.0);

let boxed = UniformBox::new(vec![-1.0], vec![1.0]);
assert_eq!(boxed.unnorm_log_prob(&[0.3]), 0.0);
assert_eq!(boxed.unnorm_log_prob(&[1.3]), f64::NEG_INFINITY);

let closure = |x: &[f64]| -x[0].abs();
assert_eq!(closure.unnorm_log_prob(&[-2.0]), -2.0);
```
*/

use ndarray::{Array1, Array2};
use num_traits::Float;
use std::f64::consts::PI;

/// A trait for continuous target distributions from which we want to sample.
pub trait TargetDistribution<T: Float> {
    /// Returns the log of the unnormalized density at `theta`, or negative infinity
    /// outside the support.
    fn unnorm_log_prob(&self, theta: &[T]) -> T;
}

impl<T, F> TargetDistribution<T> for F
where
    T: Float,
    F: Fn(&[T]) -> T,
{
    fn unnorm_log_prob(&self, theta: &[T]) -> T {
        self(theta)
    }
}

/// A trait for distributions that provide a normalized log-density (e.g., for diagnostics).
pub trait Normalized<T: Float> {
    /// Returns the normalized log-density for state `theta`.
    fn log_prob(&self, theta: &[T]) -> T;
}

/**
A 2D Gaussian distribution parameterized by a mean vector and a 2×2 covariance matrix.

```rust
use slice_mcmc::distributions::{Gaussian2D, Normalized};
use ndarray::{arr1, arr2};

let gauss = Gaussian2D {
    mean: arr1(&[0.0, 0.0]),
    cov: arr2(&[[1.0, 0.0], [0.0, 1.0]]),
};
let lp = gauss.log_prob(&[0.5, -0.5]);
println!("Log probability: {}", lp);
```
*/
#[derive(Clone, Debug, PartialEq)]
pub struct Gaussian2D<T: Float> {
    pub mean: Array1<T>,
    pub cov: Array2<T>,
}

impl<T: Float> Gaussian2D<T> {
    /// Half the Mahalanobis distance of `theta` from the mean, and the covariance determinant.
    fn half_quad_form(&self, theta: &[T]) -> (T, T) {
        let (a, b, c, d) = (
            self.cov[(0, 0)],
            self.cov[(0, 1)],
            self.cov[(1, 0)],
            self.cov[(1, 1)],
        );
        let det = a * d - b * c;
        let x = theta[0] - self.mean[0];
        let y = theta[1] - self.mean[1];
        // inverse covariance is [[d, -b], [-c, a]] / det
        let quad = (x * (d * x - b * y) + y * (a * y - c * x)) / det;
        let half = T::from(0.5).unwrap_or_else(T::one);
        (half * quad, det)
    }
}

impl<T: Float> TargetDistribution<T> for Gaussian2D<T> {
    fn unnorm_log_prob(&self, theta: &[T]) -> T {
        let (half_quad, _) = self.half_quad_form(theta);
        -half_quad
    }
}

impl<T: Float> Normalized<T> for Gaussian2D<T> {
    fn log_prob(&self, theta: &[T]) -> T {
        let (half_quad, det) = self.half_quad_form(theta);
        let two_pi = T::from(2.0 * PI).unwrap_or_else(T::one);
        let half = T::from(0.5).unwrap_or_else(T::one);
        -two_pi.ln() - half * det.abs().ln() - half_quad
    }
}

/**
A zero-mean isotropic Gaussian of any dimension with standard deviation `std`.

```rust
use slice_mcmc::distributions::{IsotropicGaussian, TargetDistribution};

let target = IsotropicGaussian::new(1.0);
assert_eq!(target.unnorm_log_prob(&[1.0, 1.0]), -1.0);
```
*/
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IsotropicGaussian<T: Float> {
    pub std: T,
}

impl<T: Float> IsotropicGaussian<T> {
    pub fn new(std: T) -> Self {
        Self { std }
    }
}

impl<T: Float> TargetDistribution<T> for IsotropicGaussian<T> {
    fn unnorm_log_prob(&self, theta: &[T]) -> T {
        let sum = theta.iter().fold(T::zero(), |acc, &x| acc + x * x);
        let half = T::from(0.5).unwrap_or_else(T::one);
        -half * sum / (self.std * self.std)
    }
}

impl<T: Float> Normalized<T> for IsotropicGaussian<T> {
    fn log_prob(&self, theta: &[T]) -> T {
        let d = T::from(theta.len()).unwrap_or_else(T::zero);
        let two_pi = T::from(2.0 * PI).unwrap_or_else(T::one);
        let half = T::from(0.5).unwrap_or_else(T::one);
        self.unnorm_log_prob(theta) - half * d * (two_pi * self.std * self.std).ln()
    }
}

/**
A flat density on the axis-aligned box `[lower, upper]`: zero log-density inside, negative
infinity outside. Useful for exercising bracketing at hard support boundaries.

```rust
use slice_mcmc::distributions::{TargetDistribution, UniformBox};

let target = UniformBox::new(vec![0.0, -1.0], vec![1.0, 1.0]);
assert_eq!(target.unnorm_log_prob(&[0.5, 0.0]), 0.0);
assert_eq!(target.unnorm_log_prob(&[0.5, 2.0]), f64::NEG_INFINITY);
```
*/
#[derive(Clone, Debug, PartialEq)]
pub struct UniformBox<T: Float> {
    pub lower: Vec<T>,
    pub upper: Vec<T>,
}

impl<T: Float> UniformBox<T> {
    pub fn new(lower: Vec<T>, upper: Vec<T>) -> Self {
        Self { lower, upper }
    }
}

impl<T: Float> TargetDistribution<T> for UniformBox<T> {
    fn unnorm_log_prob(&self, theta: &[T]) -> T {
        let inside = theta
            .iter()
            .zip(self.lower.iter().zip(&self.upper))
            .all(|(&x, (&lo, &hi))| x >= lo && x <= hi);
        if inside {
            T::zero()
        } else {
            T::neg_infinity()
        }
    }
}
