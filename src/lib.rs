/*!
# slice-mcmc

A compact library for drawing samples from a distribution known only through an
unnormalized log-density, using slice sampling with stepping out and shrinkage. No
gradients, no normalizing constant, little tuning.

```rust
use slice_mcmc::config::SliceConfig;
use slice_mcmc::slice_sampler::SliceMarkovChain;

// a density that is zero outside [-1, 1]
let target = |x: &[f64]| if x[0].abs() <= 1.0 { 0.0 } else { f64::NEG_INFINITY };
let chain = SliceMarkovChain::new(target, &[0.0], SliceConfig::default().seed(1))?;
for sample in chain.take(100) {
    assert!(sample.value()[0].abs() <= 1.0);
}
# Ok::<(), slice_mcmc::error::SliceError>(())
```

Modules, leaves first: [`sample`], [`direction`], [`slice`] (the step-out / step-in
procedure) and [`slice_sampler`] (chains with burn-in and thinning). [`core`] runs many
chains in parallel; [`stats`] backs its progress output.
*/

pub mod config;
pub mod core;
pub mod direction;
pub mod distributions;
pub mod error;
pub mod io;
pub mod sample;
pub mod slice;
pub mod slice_sampler;
pub mod stats;
