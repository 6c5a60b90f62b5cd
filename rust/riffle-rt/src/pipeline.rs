//! Per-iteration orchestration of the distributed sort-and-merge flow.
//!
//! Each iteration: the coordinator regenerates the dataset (seed offset by
//! the iteration index), scatters equal chunks, the group synchronizes on
//! a barrier, every member sorts its chunk, the sorted chunks are gathered
//! back contiguous by rank, and the coordinator merges the sections. The
//! coordinator's timed window opens right after the barrier and closes
//! when gather completes — generation, scatter, and merge stay outside it.
//! Workers time their own sorts too, but those observations are discarded;
//! only the coordinator's wall-clock view is reported.
//!
//! Dataset and chunk buffers are allocated once and reused across
//! iterations. The merged result is rebuilt per iteration and the final
//! one is returned in the [`RunReport`].

use crate::collective::{Collective, CollectiveError};
use crate::group::{GroupError, LocalEndpoint, LocalGroup};
use crate::source::DataSource;

use riffle_core::error::{ConfigError, MergeError};
use riffle_core::merge::merge_sections;
use riffle_core::partition::chunk_len;
use riffle_core::shell::ShellSorter;

use std::time::{Duration, Instant};
use thiserror::Error;

/// Anything that can end a pipeline run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Merge(#[from] MergeError),
    #[error(transparent)]
    Collective(#[from] CollectiveError),
    #[error(transparent)]
    Group(#[from] GroupError),
    #[error("iteration count must be nonzero")]
    ZeroIterations,
    #[error("group completed without a coordinator report")]
    MissingReport,
}

/// Parameters of one pipeline run. Defaults are the classic benchmark
/// shape: one million elements, ten iterations, seed 42.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelinePlan {
    pub total_size: usize,
    pub iterations: usize,
    pub seed: u64,
}

impl Default for PipelinePlan {
    fn default() -> Self {
        Self {
            total_size: 1_000_000,
            iterations: 10,
            seed: 42,
        }
    }
}

/// The coordinator's view of a completed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub group_size: usize,
    pub iterations: usize,
    /// Sum of the coordinator's timed windows across iterations.
    pub total: Duration,
    /// `total / iterations`.
    pub mean: Duration,
    /// Merged output of the final iteration.
    pub sorted: Vec<i32>,
}

/// Run the pipeline as one group member.
///
/// Every member of the group must call this with the same plan — the
/// collective contract of [`Collective`] applies. Only the coordinator
/// returns a report; workers return `Ok(None)`.
pub fn run_member<C, S>(
    endpoint: &C,
    source: &S,
    sorter: &ShellSorter,
    plan: &PipelinePlan,
) -> Result<Option<RunReport>, PipelineError>
where
    C: Collective<i32>,
    S: DataSource + ?Sized,
{
    if plan.iterations == 0 {
        return Err(PipelineError::ZeroIterations);
    }
    let size = endpoint.group_size();
    let chunk_size = chunk_len(plan.total_size, size)?;

    let mut dataset = if endpoint.is_root() {
        vec![0i32; plan.total_size]
    } else {
        Vec::new()
    };
    let mut chunk = vec![0i32; chunk_size];
    let mut accumulated = Duration::ZERO;

    for iteration in 0..plan.iterations {
        if endpoint.is_root() {
            source.fill(&mut dataset, plan.seed.wrapping_add(iteration as u64));
        }

        let root_data = if endpoint.is_root() {
            Some(dataset.as_slice())
        } else {
            None
        };
        endpoint.scatter(root_data, &mut chunk)?;
        endpoint.barrier();

        let window = Instant::now();
        sorter.sort(&mut chunk);
        let root_dest = if endpoint.is_root() {
            Some(dataset.as_mut_slice())
        } else {
            None
        };
        endpoint.gather(&chunk, root_dest)?;

        if endpoint.is_root() {
            // window closes at gather completion; the merge is untimed
            accumulated += window.elapsed();
            let merged = merge_sections(&dataset, size, chunk_size)?;
            dataset.copy_from_slice(&merged);
        }
    }

    if endpoint.is_root() {
        let mean = accumulated / plan.iterations as u32;
        Ok(Some(RunReport {
            group_size: size,
            iterations: plan.iterations,
            total: accumulated,
            mean,
            sorted: dataset,
        }))
    } else {
        Ok(None)
    }
}

/// Run the full pipeline on a thread-backed group of `group_size` members
/// and return the coordinator's report.
///
/// Geometry and iteration count are validated before any thread spawns, so
/// a bad configuration never leaves a half-started group behind.
pub fn run_local<S>(
    group_size: usize,
    plan: &PipelinePlan,
    sorter: ShellSorter,
    source: &S,
) -> Result<RunReport, PipelineError>
where
    S: DataSource + Sync + ?Sized,
{
    if plan.iterations == 0 {
        return Err(PipelineError::ZeroIterations);
    }
    chunk_len(plan.total_size, group_size)?;

    let reports = LocalGroup::run(group_size, |endpoint: LocalEndpoint<i32>| {
        run_member(&endpoint, source, &sorter, plan)
    })?;
    reports
        .into_iter()
        .flatten()
        .next()
        .ok_or(PipelineError::MissingReport)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::UniformSource;

    #[test]
    fn zero_iterations_is_rejected() {
        let plan = PipelinePlan {
            total_size: 8,
            iterations: 0,
            seed: 0,
        };
        let err = run_local(2, &plan, ShellSorter::sequential(), &UniformSource).unwrap_err();
        assert_eq!(err, PipelineError::ZeroIterations);
    }

    #[test]
    fn uneven_geometry_is_rejected_before_the_group_starts() {
        let plan = PipelinePlan {
            total_size: 10,
            iterations: 1,
            seed: 0,
        };
        let err = run_local(3, &plan, ShellSorter::sequential(), &UniformSource).unwrap_err();
        assert_eq!(
            err,
            PipelineError::Config(ConfigError::UnevenSplit {
                total: 10,
                workers: 3
            })
        );
    }

    #[test]
    fn default_plan_matches_the_classic_benchmark_shape() {
        let plan = PipelinePlan::default();
        assert_eq!(plan.total_size, 1_000_000);
        assert_eq!(plan.iterations, 10);
        assert_eq!(plan.seed, 42);
    }
}
