/*!
# The slice procedure

One slice update moves a [`Sample`] along a fixed direction in three phases:

1. **Slice height.** Draw `u ~ Uniform(0, 1)` and set
   `log_height = ln(u) + log_likelihood(initial)`. Everything stays in log space, so
   densities spanning hundreds of orders of magnitude are handled without underflow.
2. **Step out.** Place an interval of width `init_step` around the current point at a
   random offset, then push each end outwards until the log-likelihood there drops to
   `log_height` or below. The `k`-th expansion of an end adds `init_step * step_base^k`, so
   `step_base = 1` grows the bracket linearly and `step_base = 2` doubles every push.
   An expansion that would produce a non-finite coordinate is not taken; the end stays at
   the last finite distance it reached.
3. **Step in.** Draw a displacement uniformly within the bracket. Accept it if its
   log-likelihood reaches `log_height`, otherwise move the end on the same side as the
   rejected draw onto it, and draw again.

Step-in has no iteration cap. For targets that are continuous and bounded above it ends
with probability one; for pathological targets it may not, and capping it would bias the
chain. Likewise step-out does not terminate for a target whose log-density never falls
below the slice height along the direction (an improper, flat density).
*/

use log::trace;
use num_traits::Float;
use rand::Rng;
use rand_distr::{Distribution, Open01, Standard};

use crate::distributions::TargetDistribution;
use crate::sample::Sample;

/// Displacements `(lower, upper)` along a direction, relative to the starting point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds<T> {
    pub lower: T,
    pub upper: T,
}

impl<T: Float> Bounds<T> {
    /// Moves the end on the side of a rejected displacement `d` onto it.
    ///
    /// `d` is expected to lie within the bounds, which makes the update monotone: `lower`
    /// never decreases and `upper` never increases.
    pub fn shrink(&mut self, d: T) {
        if d < T::zero() {
            self.lower = d;
        } else {
            self.upper = d;
        }
    }

    pub fn contains(&self, d: T) -> bool {
        self.lower <= d && d <= self.upper
    }

    pub fn width(&self) -> T {
        self.upper - self.lower
    }
}

/// The outcome of one slice update.
#[derive(Debug, Clone)]
pub struct SliceDraw<T> {
    /// The accepted sample; its log-likelihood is already known.
    pub sample: Sample<T>,
    /// Displacement of the accepted sample along the direction.
    pub displacement: T,
    /// The bracket as it stood when the sample was accepted.
    pub bounds: Bounds<T>,
    /// Slice height the sample was accepted against.
    pub log_height: T,
}

/// Performs one slice update of `initial` along `direction`.
///
/// Returns a sample whose log-likelihood is at least the drawn slice height.
pub fn slice_step<T, D, R>(
    target: &D,
    initial: &Sample<T>,
    direction: &[T],
    init_step: T,
    step_base: T,
    rng: &mut R,
) -> SliceDraw<T>
where
    T: Float,
    D: TargetDistribution<T> + ?Sized,
    R: Rng + ?Sized,
    Standard: Distribution<T>,
    Open01: Distribution<T>,
{
    let log_height = slice_height(target, initial, rng);
    let bounds = step_out(
        target, initial, direction, log_height, init_step, step_base, rng,
    );
    step_in(target, initial, direction, log_height, bounds, rng)
}

/// Draws the log of a height uniformly distributed under the density at `initial`.
pub fn slice_height<T, D, R>(target: &D, initial: &Sample<T>, rng: &mut R) -> T
where
    T: Float,
    D: TargetDistribution<T> + ?Sized,
    R: Rng + ?Sized,
    Open01: Distribution<T>,
{
    let u: T = Open01.sample(rng);
    u.ln() + initial.log_likelihood(target)
}

/// Brackets the slice at `log_height` along `direction`.
///
/// The returned bounds satisfy `lower <= 0 <= upper`.
pub fn step_out<T, D, R>(
    target: &D,
    initial: &Sample<T>,
    direction: &[T],
    log_height: T,
    init_step: T,
    step_base: T,
    rng: &mut R,
) -> Bounds<T>
where
    T: Float,
    D: TargetDistribution<T> + ?Sized,
    R: Rng + ?Sized,
    Standard: Distribution<T>,
{
    let offset: T = Standard.sample(rng);
    let origin = initial.value();
    let lower = expand(
        target,
        origin,
        direction,
        log_height,
        (offset - T::one()) * init_step,
        -T::one(),
        init_step,
        step_base,
    );
    let upper = expand(
        target,
        origin,
        direction,
        log_height,
        offset * init_step,
        T::one(),
        init_step,
        step_base,
    );
    Bounds { lower, upper }
}

/// Pushes one end of the bracket outwards, in the direction of `sign`, until it leaves the
/// slice or the next push would overflow.
#[allow(clippy::too_many_arguments)]
fn expand<T, D>(
    target: &D,
    origin: &[T],
    direction: &[T],
    log_height: T,
    start: T,
    sign: T,
    init_step: T,
    step_base: T,
) -> T
where
    T: Float,
    D: TargetDistribution<T> + ?Sized,
{
    let mut distance = start;
    let mut point = displaced(origin, direction, distance);
    let mut increment = init_step;
    let mut steps_taken = 0usize;
    while target.unnorm_log_prob(&point) > log_height {
        let next = distance + sign * increment;
        let next_point = displaced(origin, direction, next);
        if next_point.iter().any(|x| !x.is_finite()) {
            trace!(
                "step-out overflow after {} expansions, keeping distance {:?}",
                steps_taken,
                distance.to_f64()
            );
            break;
        }
        distance = next;
        point = next_point;
        increment = increment * step_base;
        steps_taken += 1;
    }
    distance
}

/// Shrinks `bounds` around the starting point until a draw lands inside the slice.
pub fn step_in<T, D, R>(
    target: &D,
    initial: &Sample<T>,
    direction: &[T],
    log_height: T,
    mut bounds: Bounds<T>,
    rng: &mut R,
) -> SliceDraw<T>
where
    T: Float,
    D: TargetDistribution<T> + ?Sized,
    R: Rng + ?Sized,
    Standard: Distribution<T>,
{
    let origin = initial.value();
    loop {
        let u: T = Standard.sample(rng);
        // `upper - lower` can overflow even though both ends are finite
        let d = (bounds.lower * (T::one() - u) + bounds.upper * u)
            .max(bounds.lower)
            .min(bounds.upper);
        let point = displaced(origin, direction, d);
        let log_lik = target.unnorm_log_prob(&point);
        if log_lik >= log_height {
            return SliceDraw {
                sample: Sample::with_log_likelihood(point, log_lik),
                displacement: d,
                bounds,
                log_height,
            };
        }
        bounds.shrink(d);
    }
}

/// `origin + direction * distance`.
pub fn displaced<T: Float>(origin: &[T], direction: &[T], distance: T) -> Vec<T> {
    origin
        .iter()
        .zip(direction)
        .map(|(&x, &v)| x + v * distance)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distributions::UniformBox;
    use approx::assert_abs_diff_eq;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;
    use std::cell::RefCell;

    /// Wraps a target and records every point it is asked about.
    struct Recording<D> {
        inner: D,
        points: RefCell<Vec<Vec<f64>>>,
    }

    impl<D> Recording<D> {
        fn new(inner: D) -> Self {
            Self {
                inner,
                points: RefCell::new(Vec::new()),
            }
        }

        fn take(&self) -> Vec<Vec<f64>> {
            self.points.borrow_mut().drain(..).collect()
        }
    }

    impl<D: TargetDistribution<f64>> TargetDistribution<f64> for Recording<D> {
        fn unnorm_log_prob(&self, theta: &[f64]) -> f64 {
            self.points.borrow_mut().push(theta.to_vec());
            self.inner.unnorm_log_prob(theta)
        }
    }

    fn std_normal(x: &[f64]) -> f64 {
        -0.5 * x.iter().map(|v| v * v).sum::<f64>()
    }

    #[test]
    fn test_bounds_shrink_by_side() {
        let mut b = Bounds {
            lower: -2.0,
            upper: 3.0,
        };
        b.shrink(-1.0);
        assert_eq!(b, Bounds { lower: -1.0, upper: 3.0 });
        b.shrink(0.5);
        assert_eq!(b, Bounds { lower: -1.0, upper: 0.5 });
        b.shrink(0.0);
        assert_eq!(b, Bounds { lower: -1.0, upper: 0.0 });
        assert!(b.contains(-0.5));
        assert!(!b.contains(0.1));
        assert_eq!(b.width(), 1.0);
    }

    #[test]
    fn test_step_out_brackets_origin_and_leaves_slice() {
        let mut rng = SmallRng::seed_from_u64(42);
        let initial = Sample::new(vec![0.3]);
        for _ in 0..500 {
            let log_height = slice_height(&std_normal, &initial, &mut rng);
            let b = step_out(&std_normal, &initial, &[1.0], log_height, 0.1, 2.0, &mut rng);
            assert!(b.lower <= 0.0 && 0.0 <= b.upper, "bad bracket {:?}", b);
            assert!(std_normal(&[0.3 + b.lower]) <= log_height);
            assert!(std_normal(&[0.3 + b.upper]) <= log_height);
        }
    }

    #[test]
    fn test_step_out_linear_schedule() {
        let target = Recording::new(UniformBox::new(vec![-5.0], vec![5.0]));
        let mut rng = SmallRng::seed_from_u64(1);
        let initial = Sample::with_log_likelihood(vec![0.0], 0.0);
        let b = step_out(&target, &initial, &[1.0], -1.0, 0.25, 1.0, &mut rng);
        let points = target.take();
        // lower end is evaluated first, all at negative displacements
        let lower: Vec<f64> = points.iter().map(|p| p[0]).filter(|&x| x < 0.0).collect();
        let upper: Vec<f64> = points.iter().map(|p| p[0]).filter(|&x| x >= 0.0).collect();
        for w in lower.windows(2) {
            assert_abs_diff_eq!(w[0] - w[1], 0.25, epsilon = 1e-12);
        }
        for w in upper.windows(2) {
            assert_abs_diff_eq!(w[1] - w[0], 0.25, epsilon = 1e-12);
        }
        // n expansions add n * init_step on each side
        let n_lower = (lower.len() - 1) as f64;
        let n_upper = (upper.len() - 1) as f64;
        assert_abs_diff_eq!(b.upper - b.lower, 0.25 + 0.25 * (n_lower + n_upper), epsilon = 1e-9);
        assert!(b.lower < -5.0 && b.upper > 5.0);
        assert!(b.lower >= -5.25 && b.upper <= 5.25);
    }

    #[test]
    fn test_step_out_geometric_schedule() {
        let target = Recording::new(UniformBox::new(vec![-100.0], vec![100.0]));
        let mut rng = SmallRng::seed_from_u64(2);
        let initial = Sample::with_log_likelihood(vec![0.0], 0.0);
        step_out(&target, &initial, &[1.0], -1.0, 0.1, 2.0, &mut rng);
        let upper: Vec<f64> = target
            .take()
            .iter()
            .map(|p| p[0])
            .filter(|&x| x >= 0.0)
            .collect();
        assert!(upper.len() > 5);
        for (k, w) in upper.windows(2).enumerate() {
            assert_abs_diff_eq!(w[1] - w[0], 0.1 * 2f64.powi(k as i32), epsilon = 1e-9);
        }
    }

    #[test]
    fn test_step_out_stops_before_overflow() {
        // flat everywhere: only the overflow guard can stop the expansion
        let flat = |_: &[f64]| 0.0;
        let mut rng = SmallRng::seed_from_u64(3);
        let initial = Sample::with_log_likelihood(vec![0.0], 0.0);
        let b = step_out(&flat, &initial, &[1.0], -1.0, 1.0, 2.0, &mut rng);
        assert!(b.lower.is_finite() && b.upper.is_finite());
        assert!(b.lower < -1e300 && b.upper > 1e300);
        assert!(b.lower <= 0.0 && 0.0 <= b.upper);
    }

    #[test]
    fn test_step_in_after_overflow_stays_finite() {
        let flat = |_: &[f64]| 0.0;
        let mut rng = SmallRng::seed_from_u64(3);
        let initial = Sample::with_log_likelihood(vec![0.0], 0.0);
        let b = step_out(&flat, &initial, &[1.0], -1.0, 1.0, 2.0, &mut rng);
        assert!(b.width().is_infinite());
        for _ in 0..100 {
            let draw = step_in(&flat, &initial, &[1.0], -1.0, b, &mut rng);
            assert!(draw.displacement.is_finite());
            assert!(b.contains(draw.displacement));
            assert!(draw.sample.value()[0].is_finite());
        }
    }

    #[test]
    fn test_step_out_overflow_on_first_expansion_keeps_offset() {
        // one step of init_step already overflows, so neither end may move
        let flat = |_: &[f64]| 0.0;
        let mut rng = SmallRng::seed_from_u64(4);
        let origin = f64::MAX / 2.0;
        let initial = Sample::with_log_likelihood(vec![origin], 0.0);
        let init_step = f64::MAX;
        let mut replay = SmallRng::seed_from_u64(4);
        let offset: f64 = Standard.sample(&mut replay);
        let b = step_out(&flat, &initial, &[1.0], -1.0, init_step, 2.0, &mut rng);
        assert_eq!(b.upper, offset * init_step);
        assert_eq!(b.lower, (offset - 1.0) * init_step);
    }

    #[test]
    fn test_step_in_shrinks_monotonically() {
        let target = Recording::new(std_normal);
        let mut rng = SmallRng::seed_from_u64(5);
        let initial = Sample::with_log_likelihood(vec![0.0], 0.0);
        for _ in 0..200 {
            let log_height = slice_height(&target, &initial, &mut rng);
            // a wide bracket forces several rejections
            let start = Bounds {
                lower: -50.0,
                upper: 50.0,
            };
            let draw = step_in(&target, &initial, &[1.0], log_height, start, &mut rng);
            let candidates: Vec<f64> = target.take().iter().map(|p| p[0]).collect();
            let (accepted, rejected) = candidates.split_last().unwrap();
            let mut bounds = start;
            for &d in rejected {
                assert!(bounds.contains(d));
                assert!(std_normal(&[d]) < log_height);
                let before = bounds;
                bounds.shrink(d);
                assert!(bounds.lower >= before.lower && bounds.upper <= before.upper);
            }
            assert_eq!(bounds, draw.bounds);
            assert_eq!(*accepted, draw.displacement);
            assert!(draw.bounds.contains(draw.displacement));
            assert!(draw.sample.known_log_likelihood().unwrap() >= log_height);
        }
    }

    #[test]
    fn test_slice_step_respects_support() {
        let target = UniformBox::new(vec![-1.0], vec![1.0]);
        let mut rng = SmallRng::seed_from_u64(6);
        let mut current = Sample::new(vec![0.0]);
        for _ in 0..2_000 {
            let draw = slice_step(&target, &current, &[1.0], 0.1, 2.0, &mut rng);
            assert!(draw.bounds.lower <= 0.0 && 0.0 <= draw.bounds.upper);
            current = draw.sample;
            let x = current.value()[0];
            assert!((-1.0..=1.0).contains(&x), "sample {x} left the support");
            assert_eq!(current.known_log_likelihood(), Some(0.0));
        }
    }

    #[test]
    fn test_slice_step_moves_along_direction_only() {
        let mut rng = SmallRng::seed_from_u64(8);
        let initial = Sample::new(vec![1.0, -2.0, 0.5]);
        let draw = slice_step(&std_normal, &initial, &[0.0, 1.0, 0.0], 0.1, 2.0, &mut rng);
        let value = draw.sample.value();
        assert_eq!(value[0], 1.0);
        assert_eq!(value[2], 0.5);
        assert_abs_diff_eq!(value[1], -2.0 + draw.displacement, epsilon = 1e-12);
    }
}
