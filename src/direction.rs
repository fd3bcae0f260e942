//! Choice of the lines along which slices are taken.

use log::trace;
use num_traits::Float;
use rand::seq::SliceRandom;
use rand::Rng;
use rand_distr::{Distribution, StandardNormal};

/// How an internal sampling step picks its slice directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DirectionStrategy {
    /// One slice per coordinate axis, visiting the axes in a fresh random order every step.
    #[default]
    Componentwise,
    /// A single slice along a direction drawn uniformly from the unit sphere.
    Composite,
}

/// The coordinate axes `0..dim` in uniformly random order.
pub fn axis_permutation<R: Rng + ?Sized>(dim: usize, rng: &mut R) -> Vec<usize> {
    let mut axes: Vec<usize> = (0..dim).collect();
    axes.shuffle(rng);
    axes
}

/// A direction uniformly distributed on the unit sphere in `dim` dimensions.
///
/// Normalizes a vector of independent standard-normal draws. A draw whose norm is zero or
/// not finite cannot be normalized and is replaced by a fresh one. `dim` must be positive.
pub fn random_unit_vector<T, R>(dim: usize, rng: &mut R) -> Vec<T>
where
    T: Float,
    R: Rng + ?Sized,
    StandardNormal: Distribution<T>,
{
    debug_assert!(dim > 0, "cannot draw a direction in zero dimensions");
    loop {
        let draw: Vec<T> = (0..dim).map(|_| StandardNormal.sample(rng)).collect();
        let norm = draw.iter().fold(T::zero(), |acc, &x| acc + x * x).sqrt();
        if norm > T::zero() && norm.is_finite() {
            return draw.into_iter().map(|x| x / norm).collect();
        }
        trace!("degenerate direction draw (norm {:?}), redrawing", norm.to_f64());
    }
}
