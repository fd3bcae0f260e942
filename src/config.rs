/*!
Sampler settings.

[`SliceConfig`] is a plain value with consuming builder setters. It is checked once, when a
chain is built from it, and never changes afterwards.

```rust
use slice_mcmc::config::SliceConfig;

let config = SliceConfig::<f64>::default()
    .burnin(500)
    .thin(4)
    .componentwise(false)
    .init_step(0.5)
    .step_base(1.5)
    .seed(42);
assert!(config.validate().is_ok());
assert!(SliceConfig::<f64>::default().step_base(2.5).validate().is_err());
```
*/

use num_traits::Float;

use crate::direction::DirectionStrategy;
use crate::error::{Result, SliceError};

/// Settings of a slice-sampling chain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SliceConfig<T> {
    /// Internal steps performed and discarded when the chain is built.
    pub burnin: usize,
    /// Internal steps discarded between two emitted samples.
    pub thin: usize,
    /// How slice directions are drawn.
    pub direction: DirectionStrategy,
    /// Width of the first bracket and of the first expansion.
    pub init_step: T,
    /// Growth factor of successive expansions while stepping out.
    pub step_base: T,
    /// Seed of the chain RNG. Drawn from the thread RNG when unset.
    pub seed: Option<u64>,
}

impl<T: Float> Default for SliceConfig<T> {
    fn default() -> Self {
        Self {
            burnin: 0,
            thin: 0,
            direction: DirectionStrategy::Componentwise,
            init_step: T::from(0.1).unwrap_or_else(T::one),
            step_base: T::one() + T::one(),
            seed: None,
        }
    }
}

impl<T: Float> SliceConfig<T> {
    pub fn burnin(mut self, burnin: usize) -> Self {
        self.burnin = burnin;
        self
    }

    pub fn thin(mut self, thin: usize) -> Self {
        self.thin = thin;
        self
    }

    /// `true` slices along each axis in turn, `false` along one random direction per step.
    pub fn componentwise(mut self, componentwise: bool) -> Self {
        self.direction = if componentwise {
            DirectionStrategy::Componentwise
        } else {
            DirectionStrategy::Composite
        };
        self
    }

    pub fn direction(mut self, direction: DirectionStrategy) -> Self {
        self.direction = direction;
        self
    }

    pub fn init_step(mut self, init_step: T) -> Self {
        self.init_step = init_step;
        self
    }

    /// `1` gives a linear stepping-out schedule, `2` doubles every expansion.
    pub fn step_base(mut self, step_base: T) -> Self {
        self.step_base = step_base;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Checks the numeric settings. `burnin` and `thin` cannot be negative by construction.
    pub fn validate(&self) -> Result<()> {
        let init_step = self.init_step;
        if !(init_step.is_finite() && init_step > T::zero()) {
            return Err(SliceError::InvalidInitStep(
                init_step.to_f64().unwrap_or(f64::NAN),
            ));
        }
        let step_base = self.step_base;
        if !(step_base >= T::one() && step_base <= T::one() + T::one()) {
            return Err(SliceError::InvalidStepBase(
                step_base.to_f64().unwrap_or(f64::NAN),
            ));
        }
        Ok(())
    }
}
