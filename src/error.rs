//! Error type shared by the samplers and the I/O helpers.

use thiserror::Error;

/// Errors reported by this crate.
///
/// Configuration problems are reported when a chain is constructed, so a chain that exists
/// is always valid. Numeric trouble inside the slice procedure (overflow while stepping out,
/// degenerate random directions) is recovered locally and never surfaces here.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SliceError {
    #[error("initial step size must be positive and finite, got {0}")]
    InvalidInitStep(f64),

    #[error("step base must lie in [1, 2], got {0}")]
    InvalidStepBase(f64),

    #[error("initial state must have at least one dimension")]
    EmptyState,

    #[error("initial state has a non-finite coordinate at index {index}")]
    NonFiniteState { index: usize },

    #[error("expected at least one chain")]
    NoChains,

    #[error("failed to assemble samples: {0}")]
    Shape(#[from] ndarray::ShapeError),

    #[cfg(feature = "csv")]
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[cfg(feature = "csv")]
    #[error(transparent)]
    Csv(#[from] csv::Error),
}

pub type Result<T, E = SliceError> = std::result::Result<T, E>;
