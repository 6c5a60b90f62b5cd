//! Error types shared by the partitioning and merge layers.

use thiserror::Error;

/// Invalid pipeline geometry, detected before any work is distributed.
///
/// Every variant is terminal for the run — geometry is validated up front
/// so that no group member starts communicating with a bad layout.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("worker count must be nonzero")]
    ZeroWorkers,
    #[error("worker index {index} out of range for {workers} workers")]
    WorkerOutOfRange { index: usize, workers: usize },
    #[error("total size {total} is not evenly divisible by {workers} workers")]
    UnevenSplit { total: usize, workers: usize },
    #[error("{count} sections of {size} elements do not cover a buffer of {total}")]
    SectionMismatch {
        count: usize,
        size: usize,
        total: usize,
    },
}

/// Failures of the k-way merge step.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MergeError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// Every section ran dry before the output was full — the gathered
    /// buffer does not hold the elements its geometry promised. Signals a
    /// logic defect, never a transient condition.
    #[error("all sections exhausted after {written} of {total} elements")]
    CorruptPartition { written: usize, total: usize },
}
