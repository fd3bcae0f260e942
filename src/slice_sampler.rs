/*!
# Slice Sampler

A slice-sampling Markov chain ([`SliceMarkovChain`]) and a multi-chain wrapper
([`SliceSampler`]) that runs independent chains in parallel.

Each *internal step* of a chain takes one or more slices through the current sample (see
[`crate::slice`]):

- **componentwise**: one slice along every coordinate axis, in a fresh random order;
- **composite**: one slice along a uniformly random direction.

A chain performs `burnin` internal steps when it is built and `thin + 1` internal steps per
emitted sample. It never runs out: as an [`Iterator`] it always yields another sample.

## Example Usage

```rust
use slice_mcmc::config::SliceConfig;
use slice_mcmc::slice_sampler::SliceMarkovChain;

// standard normal in two dimensions, as a plain closure
let target = |x: &[f64]| -0.5 * x.iter().map(|v| v * v).sum::<f64>();
let config = SliceConfig::default().burnin(100).thin(1).seed(42);
let chain = SliceMarkovChain::new(target, &[0.0, 0.0], config)?;

let draws: Vec<_> = chain.take(1_000).collect();
assert_eq!(draws.len(), 1_000);
assert!(draws.iter().all(|s| s.known_log_likelihood().is_some()));
# Ok::<(), slice_mcmc::error::SliceError>(())
```

## Reproducibility

A chain draws all randomness from its own [`SmallRng`]. Seed it through
[`SliceConfig::seed`] so that burn-in is covered too; [`SliceMarkovChain::set_seed`] only
affects draws made after the call. Chains of a [`SliceSampler`] use `seed + i`.
*/

use std::cell::Cell;

use log::debug;
use num_traits::Float;
use rand::rngs::SmallRng;
use rand::{thread_rng, Rng, SeedableRng};
use rand_distr::{Distribution, Open01, Standard, StandardNormal};
use rayon::prelude::*;

use crate::config::SliceConfig;
use crate::core::{HasChains, MarkovChain};
use crate::direction::{axis_permutation, random_unit_vector, DirectionStrategy};
use crate::distributions::TargetDistribution;
use crate::error::{Result, SliceError};
use crate::sample::Sample;
use crate::slice::slice_step;

/// Counts the log-likelihood evaluations made through it.
struct Counted<'a, D: ?Sized> {
    inner: &'a D,
    calls: Cell<u64>,
}

impl<'a, D: ?Sized> Counted<'a, D> {
    fn new(inner: &'a D) -> Self {
        Self {
            inner,
            calls: Cell::new(0),
        }
    }
}

impl<T, D> TargetDistribution<T> for Counted<'_, D>
where
    T: Float,
    D: TargetDistribution<T> + ?Sized,
{
    fn unnorm_log_prob(&self, theta: &[T]) -> T {
        self.calls.set(self.calls.get() + 1);
        self.inner.unnorm_log_prob(theta)
    }
}

/**
A single slice-sampling Markov chain.

The chain exclusively owns its current [`Sample`] and its RNG; it is not meant to be shared
between threads while stepping. Independent chains are independent values.

Neither stepping out nor stepping in is bounded. For targets that are continuous and
bounded above every step ends with probability one; for pathological targets (a log-density
that never falls off along some direction, say) a step may not terminate.
*/
#[derive(Debug, Clone)]
pub struct SliceMarkovChain<T, D> {
    /// The target distribution we want to sample from.
    pub target: D,

    /// The chain-specific random seed.
    pub seed: u64,

    /// The random number generator for this chain.
    pub rng: SmallRng,

    config: SliceConfig<T>,
    current: Sample<T>,
    n_internal_steps: u64,
    n_evals: u64,
}

impl<T, D> SliceMarkovChain<T, D>
where
    T: Float,
    D: TargetDistribution<T>,
    Standard: Distribution<T>,
    Open01: Distribution<T>,
    StandardNormal: Distribution<T>,
{
    /**
    Builds a chain at `initial_state` and performs the configured burn-in.

    # Errors

    Returns an error, and no chain, if the configuration is invalid or the initial state is
    empty or has non-finite coordinates.

    # Examples

    ```rust
    use slice_mcmc::config::SliceConfig;
    use slice_mcmc::distributions::IsotropicGaussian;
    use slice_mcmc::slice_sampler::SliceMarkovChain;

    let target = IsotropicGaussian::new(1.0);
    let chain = SliceMarkovChain::new(target, &[0.0, 0.0], SliceConfig::default().burnin(10))?;
    assert_eq!(chain.n_internal_steps(), 10);

    let bad = SliceMarkovChain::new(target, &[0.0], SliceConfig::default().step_base(3.0));
    assert!(bad.is_err());
    # Ok::<(), slice_mcmc::error::SliceError>(())
    ```
    */
    pub fn new(target: D, initial_state: &[T], config: SliceConfig<T>) -> Result<Self> {
        config.validate()?;
        if initial_state.is_empty() {
            return Err(SliceError::EmptyState);
        }
        if let Some(index) = initial_state.iter().position(|x| !x.is_finite()) {
            return Err(SliceError::NonFiniteState { index });
        }

        let seed = config.seed.unwrap_or_else(|| thread_rng().gen::<u64>());
        let mut chain = Self {
            target,
            seed,
            rng: SmallRng::seed_from_u64(seed),
            config,
            current: Sample::new(initial_state.to_vec()),
            n_internal_steps: 0,
            n_evals: 0,
        };
        debug!(
            "slice chain: dim {}, seed {}, burn-in {}, thin {}, {:?}",
            initial_state.len(),
            seed,
            config.burnin,
            config.thin,
            config.direction
        );

        for _ in 0..config.burnin {
            chain.internal_step();
        }
        if config.burnin > 0 {
            debug!(
                "burn-in finished after {} log-likelihood evaluations",
                chain.n_evals
            );
        }
        Ok(chain)
    }

    /// Re-seeds the RNG. Draws already made, burn-in included, are unaffected.
    pub fn set_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self.rng = SmallRng::seed_from_u64(seed);
        self
    }

    /// Performs `thin + 1` internal steps and returns the resulting sample.
    pub fn advance(&mut self) -> &Sample<T> {
        for _ in 0..=self.config.thin {
            self.internal_step();
        }
        &self.current
    }

    /// One sweep of slice updates along the directions of the configured strategy.
    fn internal_step(&mut self) {
        let counted = Counted::new(&self.target);
        let dim = self.current.dim();
        let (init_step, step_base) = (self.config.init_step, self.config.step_base);
        match self.config.direction {
            DirectionStrategy::Componentwise => {
                // one basis vector, moved from axis to axis
                let mut axis = vec![T::zero(); dim];
                for i in axis_permutation(dim, &mut self.rng) {
                    axis[i] = T::one();
                    self.current =
                        slice_step(&counted, &self.current, &axis, init_step, step_base, &mut self.rng)
                            .sample;
                    axis[i] = T::zero();
                }
            }
            DirectionStrategy::Composite => {
                let direction = random_unit_vector(dim, &mut self.rng);
                self.current = slice_step(
                    &counted,
                    &self.current,
                    &direction,
                    init_step,
                    step_base,
                    &mut self.rng,
                )
                .sample;
            }
        }
        self.n_evals += counted.calls.get();
        self.n_internal_steps += 1;
    }
}

impl<T, D> SliceMarkovChain<T, D> {
    pub fn current(&self) -> &Sample<T> {
        &self.current
    }

    pub fn config(&self) -> &SliceConfig<T> {
        &self.config
    }

    /// Internal steps performed so far, burn-in included.
    pub fn n_internal_steps(&self) -> u64 {
        self.n_internal_steps
    }

    /// Log-likelihood evaluations performed so far, burn-in included.
    pub fn n_evals(&self) -> u64 {
        self.n_evals
    }
}

impl<T, D> Iterator for SliceMarkovChain<T, D>
where
    T: Float,
    D: TargetDistribution<T>,
    Standard: Distribution<T>,
    Open01: Distribution<T>,
    StandardNormal: Distribution<T>,
{
    type Item = Sample<T>;

    /// Always `Some`: the chain can be advanced indefinitely.
    fn next(&mut self) -> Option<Self::Item> {
        Some(self.advance().clone())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (usize::MAX, None)
    }
}

impl<T, D> MarkovChain<T> for SliceMarkovChain<T, D>
where
    T: Float,
    D: TargetDistribution<T>,
    Standard: Distribution<T>,
    Open01: Distribution<T>,
    StandardNormal: Distribution<T>,
{
    fn step(&mut self) -> &[T] {
        self.advance().value()
    }

    fn current_state(&self) -> &[T] {
        self.current.value()
    }
}

/**
Independent slice-sampling chains sharing a target, configuration and starting point.

```rust
use slice_mcmc::config::SliceConfig;
use slice_mcmc::core::ChainRunner;
use slice_mcmc::distributions::IsotropicGaussian;
use slice_mcmc::slice_sampler::SliceSampler;

let config = SliceConfig::default().seed(7);
let mut sampler = SliceSampler::new(IsotropicGaussian::new(1.0), &[0.0, 0.0], 4, config)?;
assert_eq!(sampler.chains[1].seed, 8);

// 4 chains, 100 draws each after discarding 10
let samples = sampler.run(100, 10)?;
assert_eq!(samples.shape(), &[4, 100, 2]);
# Ok::<(), slice_mcmc::error::SliceError>(())
```
*/
#[derive(Debug, Clone)]
pub struct SliceSampler<T, D> {
    /// The target distribution we want to sample from.
    pub target: D,
    /// The vector of independent Markov chains.
    pub chains: Vec<SliceMarkovChain<T, D>>,
    /// The global random seed.
    pub seed: u64,
}

impl<T, D> SliceSampler<T, D>
where
    T: Float + Send + Sync,
    D: TargetDistribution<T> + Clone + Send + Sync,
    Standard: Distribution<T>,
    Open01: Distribution<T>,
    StandardNormal: Distribution<T>,
{
    /// Builds `n_chains` chains at `initial_state`, chain `i` seeded with `seed + i`. Burn-in
    /// of the chains runs in parallel.
    pub fn new(
        target: D,
        initial_state: &[T],
        n_chains: usize,
        config: SliceConfig<T>,
    ) -> Result<Self> {
        if n_chains == 0 {
            return Err(SliceError::NoChains);
        }
        config.validate()?;
        let seed = config.seed.unwrap_or_else(|| thread_rng().gen::<u64>());
        let chains = (0..n_chains)
            .into_par_iter()
            .map(|i| {
                let chain_config = config.seed(seed.wrapping_add(i as u64));
                SliceMarkovChain::new(target.clone(), initial_state, chain_config)
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            target,
            chains,
            seed,
        })
    }

    /// Re-seeds every chain with `seed + i`. Burn-in already performed is unaffected.
    pub fn set_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self.chains = self
            .chains
            .into_iter()
            .enumerate()
            .map(|(i, chain)| chain.set_seed(seed.wrapping_add(i as u64)))
            .collect();
        self
    }

    /// Mean number of log-likelihood evaluations per internal step, over all chains.
    pub fn evals_per_step(&self) -> f64 {
        let evals: u64 = self.chains.iter().map(|c| c.n_evals()).sum();
        let steps: u64 = self.chains.iter().map(|c| c.n_internal_steps()).sum();
        if steps == 0 {
            0.0
        } else {
            evals as f64 / steps as f64
        }
    }
}

impl<T, D> HasChains<T> for SliceSampler<T, D>
where
    T: Float + Send,
    D: TargetDistribution<T> + Send,
    Standard: Distribution<T>,
    Open01: Distribution<T>,
    StandardNormal: Distribution<T>,
{
    type Chain = SliceMarkovChain<T, D>;

    fn chains_mut(&mut self) -> &mut Vec<Self::Chain> {
        &mut self.chains
    }
}
