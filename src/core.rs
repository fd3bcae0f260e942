//! Chain plumbing shared by every sampler: the [`MarkovChain`] trait, collection of draws
//! into arrays, and parallel execution of independent chains.

use std::time::{Duration, Instant};

use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use log::{info, warn};
use ndarray::{Array2, Array3, Axis};
use num_traits::Float;
use rayon::prelude::*;

use crate::error::{Result, SliceError};
use crate::stats::{max_rhat, ChainStats, ChainTracker};

const UPDATE_INTERVAL: Duration = Duration::from_millis(500);

pub trait MarkovChain<T> {
    /// Advances the chain to its next emitted state and returns it.
    fn step(&mut self) -> &[T];

    /// The current state, without stepping.
    fn current_state(&self) -> &[T];
}

/// Steps `chain` `n_steps` times and stacks the states into an `[n_steps, dim]` array.
pub fn run_chain<T, M>(chain: &mut M, n_steps: usize) -> Result<Array2<T>>
where
    M: MarkovChain<T> + ?Sized,
    T: Float,
{
    let dim = chain.current_state().len();
    let mut flat = Vec::with_capacity(n_steps * dim);
    for _ in 0..n_steps {
        flat.extend_from_slice(chain.step());
    }
    Ok(Array2::from_shape_vec((n_steps, dim), flat)?)
}

/// Like [`run_chain`], advancing `pb` and showing running means of the first coordinates.
pub fn run_chain_with_progress<T, M>(
    chain: &mut M,
    n_steps: usize,
    pb: &ProgressBar,
) -> Result<(Array2<T>, ChainStats)>
where
    M: MarkovChain<T> + ?Sized,
    T: Float,
{
    let dim = chain.current_state().len();
    let mut flat = Vec::with_capacity(n_steps * dim);
    let mut tracker = ChainTracker::new(dim);
    let mut last = Instant::now();

    pb.set_length(n_steps as u64);
    for _ in 0..n_steps {
        let state = chain.step();
        tracker.step(state)?;
        flat.extend_from_slice(state);
        pb.inc(1);

        if last.elapsed() >= UPDATE_INTERVAL {
            let shown: Vec<String> = tracker
                .mean()
                .iter()
                .take(3)
                .map(|m| format!("{m:.2}"))
                .collect();
            pb.set_message(format!("mean≈[{}]", shown.join(", ")));
            last = Instant::now();
        }
    }

    let samples = Array2::from_shape_vec((n_steps, dim), flat)?;
    Ok((samples, tracker.stats()))
}

/// A trait for "anything that owns multiple MarkovChains".
pub trait HasChains<T> {
    type Chain: MarkovChain<T> + Send;

    fn chains_mut(&mut self) -> &mut Vec<Self::Chain>;
}

/// Runs all chains of a [`HasChains`] in parallel.
///
/// Results are shaped `[n_chains, n_collect, dim]`, following the
/// [Stan convention](https://mc-stan.org/docs/2_18/reference-manual/notation-for-samples-chains-and-draws.html)
/// of indexing chains first.
pub trait ChainRunner<T>: HasChains<T>
where
    T: Float + Send + Sync + 'static,
{
    /// Discards `n_discard` states of every chain, then collects `n_collect`.
    fn run(&mut self, n_collect: usize, n_discard: usize) -> Result<Array3<T>> {
        let results: Vec<Array2<T>> = self
            .chains_mut()
            .par_iter_mut()
            .map(|chain| {
                (0..n_discard).for_each(|_| {
                    chain.step();
                });
                run_chain(chain, n_collect)
            })
            .collect::<Result<_>>()?;
        stack_chains(results)
    }

    /// Same as [`run`](ChainRunner::run), with one progress bar per chain. Logs the maximum
    /// R-hat over all parameters once every chain has finished.
    fn run_progress(&mut self, n_collect: usize, n_discard: usize) -> Result<Array3<T>> {
        let multi = MultiProgress::new();
        let pb_style = ProgressStyle::default_bar()
            .template("{prefix:8} [{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-");

        let results: Vec<(Array2<T>, ChainStats)> = self
            .chains_mut()
            .par_iter_mut()
            .enumerate()
            .map(|(i, chain)| -> Result<(Array2<T>, ChainStats)> {
                let pb = multi.add(ProgressBar::new((n_discard + n_collect) as u64));
                pb.set_prefix(format!("Chain {i}"));
                pb.set_style(pb_style.clone());

                pb.set_message("burn-in");
                (0..n_discard).for_each(|_| {
                    chain.step();
                    pb.inc(1);
                });
                pb.reset();
                let out = run_chain_with_progress(chain, n_collect, &pb)?;
                pb.finish_with_message("Done!");
                Ok(out)
            })
            .collect::<Result<_>>()?;

        let (samples, stats): (Vec<Array2<T>>, Vec<ChainStats>) = results.into_iter().unzip();
        if stats.len() > 1 && n_collect > 1 {
            let refs: Vec<&ChainStats> = stats.iter().collect();
            let rhat = max_rhat(&refs);
            if rhat > 1.1 {
                warn!("max(rhat)≈{rhat:.3}: chains may not have mixed");
            } else {
                info!("max(rhat)≈{rhat:.3}");
            }
        }
        stack_chains(samples)
    }
}

impl<T, C> ChainRunner<T> for C
where
    T: Float + Send + Sync + 'static,
    C: HasChains<T>,
{
}

fn stack_chains<T: Float>(chains: Vec<Array2<T>>) -> Result<Array3<T>> {
    if chains.is_empty() {
        return Err(SliceError::NoChains);
    }
    let views: Vec<_> = chains.iter().map(|c| c.view()).collect();
    Ok(ndarray::stack(Axis(0), &views)?)
}
