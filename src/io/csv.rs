/*!
# Saving draws to CSV

Writes the `[n_chains, n_collect, dim]` arrays returned by
[`ChainRunner`](crate::core::ChainRunner) to CSV. Enable via the `csv` feature.
*/

use std::fmt::Display;
use std::path::Path;

use csv::WriterBuilder;
use ndarray::{Array3, Axis};

use crate::error::Result;

/**
Saves MCMC draws shaped **chain × sample × dimension** as a CSV file.

The file has a header row `chain,sample,dim_0,dim_1,...` followed by one row per draw.

# Examples

```rust
use slice_mcmc::io::csv::save_csv;
use ndarray::arr3;

let dir = std::env::temp_dir();
let data = arr3(&[[[1.0, 2.0], [3.0, 4.0]]]);
save_csv(&data, dir.join("draws.csv"))?;
# Ok::<(), slice_mcmc::error::SliceError>(())
```
*/
pub fn save_csv<T: Display>(data: &Array3<T>, path: impl AsRef<Path>) -> Result<()> {
    let (_, n_samples, n_dims) = data.dim();
    let mut wtr = WriterBuilder::new().from_path(path)?;

    let header = ["chain".to_string(), "sample".to_string()]
        .into_iter()
        .chain((0..n_dims).map(|i| format!("dim_{i}")));
    wtr.write_record(header)?;

    // lanes along the last axis come in (chain, sample) row-major order
    for (i, draw) in data.lanes(Axis(2)).into_iter().enumerate() {
        wtr.write_field((i / n_samples).to_string())?;
        wtr.write_field((i % n_samples).to_string())?;
        wtr.write_record(draw.iter().map(ToString::to_string))?;
    }

    wtr.flush()?;
    Ok(())
}
