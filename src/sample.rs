//! A point of the sample space paired with its (lazily computed) log-likelihood.

use std::cell::OnceCell;

use num_traits::Float;

use crate::distributions::TargetDistribution;

/**
An immutable point together with its unnormalized log-likelihood.

The log-likelihood is either known when the sample is built (the slice procedure already
evaluated the candidate) or pending until first requested. A pending value is computed at
most once per instance and cached; negative infinity is a legal, cached value.

```rust
use slice_mcmc::sample::Sample;

let target = |x: &[f64]| -x[0] * x[0];
let sample = Sample::new(vec![2.0]);
assert_eq!(sample.known_log_likelihood(), None);
assert_eq!(sample.log_likelihood(&target), -4.0);
assert_eq!(sample.known_log_likelihood(), Some(-4.0));
```

Two samples are equal when their points are equal. Whether the log-likelihood has been
computed yet does not enter the comparison.
*/
#[derive(Debug, Clone)]
pub struct Sample<T> {
    value: Vec<T>,
    log_likelihood: OnceCell<T>,
}

impl<T: PartialEq> PartialEq for Sample<T> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<T: Float> Sample<T> {
    /// A sample whose log-likelihood is evaluated on first access.
    pub fn new(value: Vec<T>) -> Self {
        Self {
            value,
            log_likelihood: OnceCell::new(),
        }
    }

    /// A sample whose log-likelihood has already been evaluated.
    pub fn with_log_likelihood(value: Vec<T>, log_likelihood: T) -> Self {
        Self {
            value,
            log_likelihood: OnceCell::from(log_likelihood),
        }
    }

    pub fn value(&self) -> &[T] {
        &self.value
    }

    pub fn dim(&self) -> usize {
        self.value.len()
    }

    /// Returns the cached log-likelihood, evaluating `target` if it has not been computed yet.
    pub fn log_likelihood<D>(&self, target: &D) -> T
    where
        D: TargetDistribution<T> + ?Sized,
    {
        *self
            .log_likelihood
            .get_or_init(|| target.unnorm_log_prob(&self.value))
    }

    /// The cached log-likelihood, if it has been computed.
    pub fn known_log_likelihood(&self) -> Option<T> {
        self.log_likelihood.get().copied()
    }

    pub fn into_value(self) -> Vec<T> {
        self.value
    }
}
