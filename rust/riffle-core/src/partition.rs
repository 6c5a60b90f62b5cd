//! Contiguous equal-chunk assignment of a dataset across a worker group.

use crate::error::ConfigError;
use std::ops::Range;

/// Compute the index range owned by `worker` when `total` elements are
/// divided into `workers` equal contiguous chunks.
///
/// Deterministic and stateless. Calling this for every index in
/// `0..workers` produces a partition of `0..total` with no gaps and no
/// overlap. `total` must divide evenly; uneven splits are rejected before
/// any data moves.
pub fn partition_range(
    total: usize,
    workers: usize,
    worker: usize,
) -> Result<Range<usize>, ConfigError> {
    if workers == 0 {
        return Err(ConfigError::ZeroWorkers);
    }
    if worker >= workers {
        return Err(ConfigError::WorkerOutOfRange {
            index: worker,
            workers,
        });
    }
    if total % workers != 0 {
        return Err(ConfigError::UnevenSplit { total, workers });
    }
    let chunk = total / workers;
    Ok(worker * chunk..(worker + 1) * chunk)
}

/// Per-worker chunk length for an even split, with the same validation as
/// [`partition_range`].
pub fn chunk_len(total: usize, workers: usize) -> Result<usize, ConfigError> {
    partition_range(total, workers, 0).map(|r| r.len())
}
